//! Shared types and models for the Stock Management Platform
//!
//! This crate contains the domain model shared between the backend and any
//! other components of the system (CLI tooling, integration tests).

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
