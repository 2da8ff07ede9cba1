//! Composite key granularity for budget/result matching.

use serde::{Deserialize, Serialize};

/// Which fields take part in the composite key that pairs budgets with results.
///
/// Both sides of a reconciliation must be keyed with the same granularity or
/// they will never merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyGranularity {
    /// Campaign, year, month, platform, operation type and budget type.
    #[default]
    Full,
    /// Campaign, year, month, platform and operation type; budget type is ignored.
    Operation,
}

impl KeyGranularity {
    /// Returns true if budget type participates in the key.
    #[must_use]
    pub const fn includes_budget_type(self) -> bool {
        matches!(self, Self::Full)
    }
}

impl std::str::FromStr for KeyGranularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "operation" => Ok(Self::Operation),
            _ => Err(format!("Unknown key granularity: {s}")),
        }
    }
}
