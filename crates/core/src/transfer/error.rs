//! CSV transfer errors.

use thiserror::Error;

/// File-level CSV failures. Per-row problems are reported as
/// [`RowError`](super::RowError) values instead.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Underlying CSV reader or writer failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writer buffer could not be flushed.
    #[error("Failed to flush CSV output: {0}")]
    Flush(String),

    /// The file has no header row.
    #[error("CSV input is empty")]
    Empty,

    /// A mandatory column is missing from the header.
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),
}

impl From<TransferError> for adbudget_shared::AppError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::Flush(_) => Self::Internal(err.to_string()),
            TransferError::Csv(_) | TransferError::Empty | TransferError::MissingColumn(_) => {
                Self::Validation(err.to_string())
            }
        }
    }
}
