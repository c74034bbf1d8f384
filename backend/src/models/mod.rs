//! Data models, re-exported from the shared crate

pub use shared::models::*;
pub use shared::types::*;
