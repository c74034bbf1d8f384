//! Domain models for the Stock Management Platform

pub mod catalog;
pub mod product;
pub mod trade;
pub mod user;

pub use catalog::*;
pub use product::*;
pub use trade::*;
pub use user::*;
