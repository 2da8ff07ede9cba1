//! Planning inputs: clients, campaigns, budgets and results.
//!
//! Every write goes through one of the `*Input` types here and its
//! `validated` method, which trims text and enforces ranges before anything
//! reaches the store.

pub mod error;
pub mod types;
pub mod validation;


pub use error::PlanningError;
pub use types::{
    BudgetAmounts, BudgetInput, CampaignDetails, CampaignInput, ClientInput, EntryKey,
    ResultAmounts, ResultInput,
};
pub use validation::{
    AMOUNT_SCALE, MAX_AMOUNT, MAX_LABEL_LEN, MAX_NAME_LEN, MAX_YEAR, MIN_YEAR, validate_amount,
    validate_month, validate_name, validate_period, validate_year,
};
