//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod budget;
pub mod campaign;
pub mod client;
pub mod entry;
pub mod import;
pub mod reconciliation;
pub mod result;

pub use budget::BudgetRepository;
pub use campaign::{CampaignError, CampaignRepository, CampaignWithClient};
pub use client::{ClientError, ClientRepository};
pub use entry::{EntryError, EntryFilter};
pub use import::{ImportError, ImportRepository};
pub use reconciliation::{ReconciliationInputs, ReconciliationRepository};
pub use result::ResultRepository;
