//! Core business logic for Adbudget.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `reconciliation` - Budget/result merge, derived metrics, summaries and breakdowns
//! - `planning` - Validated inputs for clients, campaigns, budgets and results
//! - `transfer` - CSV export of reconciled items and CSV import parsing

pub mod planning;
pub mod reconciliation;
pub mod transfer;
