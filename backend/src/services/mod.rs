//! Business logic services for AutoShop Manager

pub mod auth;
pub mod customer;
pub mod expense;
pub mod inventory;
pub mod invoice;
pub mod job;
pub mod notification;
pub mod reporting;
pub mod supplier;
pub mod technician;
pub mod vehicle;

pub use auth::AuthService;
pub use customer::CustomerService;
pub use expense::ExpenseService;
pub use inventory::InventoryService;
pub use invoice::InvoiceService;
pub use job::JobService;
pub use notification::NotificationService;
pub use reporting::ReportingService;
pub use supplier::SupplierService;
pub use technician::TechnicianService;
pub use vehicle::VehicleService;
