//! Shared value types used across the duskforge crates.

mod types;

pub use types::{EntityId, IntRange, Transform};
