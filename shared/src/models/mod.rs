//! Domain models for AutoShop Manager

mod charge;
mod inventory;
mod invoice;

pub use charge::*;
pub use inventory::*;
pub use invoice::*;
