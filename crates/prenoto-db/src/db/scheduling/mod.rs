pub mod booking;
pub mod service;
pub mod staff;

pub use booking::BookingRepository;
pub use service::ServiceRepository;
pub use staff::StaffRepository;
