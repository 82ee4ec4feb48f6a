//! Database repositories for the data access layer.
//!
//! Repositories are organized into control/ (tenant administration and
//! settings), crm/ (customers, tags, quotes) and scheduling/ (services,
//! staff, bookings). Each repository owns one entity's queries, and every
//! query on tenant-owned rows is scoped by `business_id`.

pub mod control;
pub mod crm;
pub mod scheduling;
