//! `SeaORM` entity definitions.

pub mod prelude;

pub mod budgets;
pub mod campaigns;
pub mod clients;
pub mod results;
