//! HTTP handlers for the AutoShop Manager API

pub mod auth;
pub mod customer;
pub mod expense;
pub mod health;
pub mod inventory;
pub mod invoice;
pub mod job;
pub mod notification;
pub mod reporting;
pub mod supplier;
pub mod technician;
pub mod vehicle;

pub use auth::*;
pub use customer::*;
pub use expense::*;
pub use health::*;
pub use inventory::*;
pub use invoice::*;
pub use job::*;
pub use notification::*;
pub use reporting::*;
pub use supplier::*;
pub use technician::*;
pub use vehicle::*;
