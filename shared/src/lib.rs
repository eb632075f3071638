//! Shared domain logic for AutoShop Manager
//!
//! This crate holds the pure computational core of the system: the invoice
//! financial model and its derivation rules, the inventory charge resolver,
//! low-stock classification, and the validation helpers used by the backend.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
