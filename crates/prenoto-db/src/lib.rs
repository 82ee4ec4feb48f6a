//! Prenoto database layer.

pub mod db;

pub use db::control::{BusinessRepository, SettingsRepository};
pub use db::crm::{CustomerRepository, QuoteRepository, TagRepository};
pub use db::scheduling::booking::NewBooking;
pub use db::scheduling::{BookingRepository, ServiceRepository, StaffRepository};
