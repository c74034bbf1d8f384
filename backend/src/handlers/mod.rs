//! HTTP handlers

pub mod analytics;
pub mod auth;
pub mod catalog;
pub mod health;
pub mod product;
pub mod purchase;
pub mod sell;
pub mod user;

pub use analytics::*;
pub use auth::*;
pub use catalog::*;
pub use health::*;
pub use product::*;
pub use purchase::*;
pub use sell::*;
pub use user::*;
