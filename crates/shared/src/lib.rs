//! Shared types, errors, and configuration for Adbudget.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for clients, campaigns, budgets and results
//! - Amount parsing and fixed-point formatting
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management
//! - JWT claims and role gating

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;


pub use auth::{Claims, Role};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
