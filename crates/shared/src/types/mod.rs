//! Common types used across the application.

pub mod granularity;
pub mod id;
pub mod money;
pub mod pagination;

pub use granularity::KeyGranularity;
pub use id::*;
pub use money::{AmountParseError, format_fixed2, parse_amount, round_metric};
pub use pagination::{PageMeta, PageRequest, PageResponse};
