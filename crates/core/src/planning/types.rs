//! Validated write inputs for clients, campaigns, budgets and results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use adbudget_shared::types::{CampaignId, ClientId};

use super::error::PlanningError;
use super::validation::{
    MAX_LABEL_LEN, optional_text, require_text, validate_amount, validate_month, validate_name,
    validate_period, validate_year,
};

/// Input for creating or replacing a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInput {
    /// Client name.
    pub name: String,
    /// Department or division label.
    #[serde(default)]
    pub department: Option<String>,
}

impl ClientInput {
    /// Trims fields and checks lengths.
    pub fn validated(self) -> Result<Self, PlanningError> {
        Ok(Self {
            name: validate_name("name", &self.name)?,
            department: optional_text("department", self.department.as_deref(), MAX_LABEL_LEN)?,
        })
    }
}

/// Mutable campaign fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDetails {
    /// Campaign name.
    pub name: String,
    /// Overall campaign budget.
    pub total_budget: Decimal,
    /// First year of the campaign.
    pub start_year: i32,
    /// First month of the campaign.
    pub start_month: u32,
    /// Last year, if the campaign has ended or has a planned end.
    #[serde(default)]
    pub end_year: Option<i32>,
    /// Last month.
    #[serde(default)]
    pub end_month: Option<u32>,
}

impl CampaignDetails {
    /// Trims the name and checks the amount and run period.
    pub fn validated(self) -> Result<Self, PlanningError> {
        validate_amount("totalBudget", self.total_budget)?;
        validate_period(self.start_year, self.start_month, self.end_year, self.end_month)?;
        Ok(Self {
            name: validate_name("name", &self.name)?,
            ..self
        })
    }
}

/// Input for creating a campaign under a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignInput {
    /// Owning client.
    pub client_id: ClientId,
    /// Editable fields.
    #[serde(flatten)]
    pub details: CampaignDetails,
}

impl CampaignInput {
    /// Validates the editable fields.
    pub fn validated(self) -> Result<Self, PlanningError> {
        Ok(Self {
            client_id: self.client_id,
            details: self.details.validated()?,
        })
    }
}

/// The six identifying fields shared by budgets and results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryKey {
    /// Campaign.
    pub campaign_id: CampaignId,
    /// Calendar year.
    pub year: i32,
    /// Calendar month.
    pub month: u32,
    /// Advertising platform.
    pub platform: String,
    /// Operation type.
    pub operation_type: String,
    /// Budget type.
    pub budget_type: String,
}

impl EntryKey {
    /// Trims the text fields and checks ranges.
    pub fn validated(self) -> Result<Self, PlanningError> {
        validate_year(self.year)?;
        validate_month(self.month)?;
        Ok(Self {
            platform: require_text("platform", &self.platform, MAX_LABEL_LEN)?,
            operation_type: require_text("operationType", &self.operation_type, MAX_LABEL_LEN)?,
            budget_type: require_text("budgetType", &self.budget_type, MAX_LABEL_LEN)?,
            ..self
        })
    }
}

/// Planned amount and optional KPI target for one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAmounts {
    /// Planned amount.
    pub amount: Decimal,
    /// Target KPI name, e.g. "CV".
    #[serde(default)]
    pub target_kpi: Option<String>,
    /// Target KPI value.
    #[serde(default)]
    pub target_value: Option<Decimal>,
}

impl BudgetAmounts {
    /// Checks amounts and trims the KPI label.
    pub fn validated(self) -> Result<Self, PlanningError> {
        validate_amount("amount", self.amount)?;
        if let Some(target) = self.target_value {
            validate_amount("targetValue", target)?;
        }
        Ok(Self {
            target_kpi: optional_text("targetKpi", self.target_kpi.as_deref(), MAX_LABEL_LEN)?,
            ..self
        })
    }
}

/// Actual spend and outcome for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultAmounts {
    /// Money actually spent.
    pub actual_spend: Decimal,
    /// Outcome metric.
    pub actual_result: Decimal,
}

impl ResultAmounts {
    /// Checks that neither amount is negative.
    pub fn validated(self) -> Result<Self, PlanningError> {
        validate_amount("actualSpend", self.actual_spend)?;
        validate_amount("actualResult", self.actual_result)?;
        Ok(self)
    }
}

/// Input for creating a budget row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetInput {
    /// Composite key.
    #[serde(flatten)]
    pub key: EntryKey,
    /// Amounts.
    #[serde(flatten)]
    pub amounts: BudgetAmounts,
}

impl BudgetInput {
    /// Validates key and amounts.
    pub fn validated(self) -> Result<Self, PlanningError> {
        Ok(Self {
            key: self.key.validated()?,
            amounts: self.amounts.validated()?,
        })
    }
}

/// Input for creating a result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultInput {
    /// Composite key.
    #[serde(flatten)]
    pub key: EntryKey,
    /// Amounts.
    #[serde(flatten)]
    pub amounts: ResultAmounts,
}

impl ResultInput {
    /// Validates key and amounts.
    pub fn validated(self) -> Result<Self, PlanningError> {
        Ok(Self {
            key: self.key.validated()?,
            amounts: self.amounts.validated()?,
        })
    }
}
