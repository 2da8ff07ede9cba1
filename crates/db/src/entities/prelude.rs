//! Entity re-exports.

pub use super::budgets::Entity as Budgets;
pub use super::campaigns::Entity as Campaigns;
pub use super::clients::Entity as Clients;
pub use super::results::Entity as Results;
