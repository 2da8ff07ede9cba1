//! CSV import and export.

pub mod error;
pub mod export;
pub mod import;

pub use error::TransferError;
pub use export::{EXPORT_COLUMNS, export_csv};
pub use import::{
    ImportRow, ImportSummary, OPTIONAL_COLUMNS, ParsedImport, REQUIRED_COLUMNS, RowError,
    parse_import,
};
