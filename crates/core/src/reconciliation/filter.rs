//! Filter criteria narrowing the store query before reconciliation.

use serde::{Deserialize, Serialize};

use adbudget_shared::types::ClientId;

use crate::planning::{PlanningError, validate_month, validate_year};

/// Criteria supplied by the caller; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileFilter {
    /// Calendar year.
    pub year: Option<i32>,
    /// Calendar month.
    pub month: Option<u32>,
    /// Owning client.
    pub client_id: Option<ClientId>,
    /// Platform (exact match).
    pub platform: Option<String>,
    /// Operation type (exact match).
    pub operation_type: Option<String>,
    /// Client department (exact match).
    pub department: Option<String>,
}

impl ReconcileFilter {
    /// Creates a new empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one year.
    #[must_use]
    pub const fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Restricts to one month.
    #[must_use]
    pub const fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    /// Restricts to one client.
    #[must_use]
    pub const fn with_client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Restricts to one platform.
    #[must_use]
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Restricts to one department.
    #[must_use]
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Drops blank text criteria and trims the rest.
    #[must_use]
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            platform: clean(self.platform),
            operation_type: clean(self.operation_type),
            department: clean(self.department),
            ..self
        }
    }

    /// Returns true if the filter matches everything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.year.is_none()
            && self.month.is_none()
            && self.client_id.is_none()
            && self.platform.is_none()
            && self.operation_type.is_none()
            && self.department.is_none()
    }

    /// Returns true if campaign-level criteria (client, department) are set.
    #[must_use]
    pub const fn narrows_campaigns(&self) -> bool {
        self.client_id.is_some() || self.department.is_some()
    }

    /// Checks year and month ranges.
    pub fn validate(&self) -> Result<(), PlanningError> {
        if let Some(year) = self.year {
            validate_year(year)?;
        }
        if let Some(month) = self.month {
            validate_month(month)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter() {
        let filter = ReconcileFilter::new();
        assert!(filter.is_empty());
        assert!(!filter.narrows_campaigns());
        assert!(filter.validate().is_ok());
    }

    #[test]
    fn test_builder_and_narrowing() {
        let filter = ReconcileFilter::new()
            .with_year(2024)
            .with_month(3)
            .with_department("第一営業部");

        assert!(!filter.is_empty());
        assert!(filter.narrows_campaigns());
        assert_eq!(filter.year, Some(2024));
        assert_eq!(filter.month, Some(3));
    }

    #[test]
    fn test_normalized_drops_blank_text() {
        let filter = ReconcileFilter {
            platform: Some("  ".to_string()),
            department: Some(" 営業部 ".to_string()),
            ..ReconcileFilter::default()
        }
        .normalized();

        assert_eq!(filter.platform, None);
        assert_eq!(filter.department.as_deref(), Some("営業部"));
    }

    #[test]
    fn test_validate_rejects_bad_month() {
        let filter = ReconcileFilter::new().with_month(13);
        assert!(matches!(
            filter.validate(),
            Err(PlanningError::InvalidMonth(13))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_year() {
        let filter = ReconcileFilter::new().with_year(1999);
        assert!(matches!(
            filter.validate(),
            Err(PlanningError::InvalidYear(1999))
        ));
    }
}
