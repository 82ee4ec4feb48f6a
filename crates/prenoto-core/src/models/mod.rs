//! Domain models shared across crates.
//!
//! Row structs derive `sqlx::FromRow` behind the `sqlx` feature; request
//! DTOs carry `validator` rules and `utoipa` schemas.

pub mod booking;
pub mod business;
pub mod customer;
pub mod quote;
pub mod service;
pub mod staff;

pub use booking::{
    Booking, BookingConfirmation, BookingDetails, BookingListQuery, BookingPeriod, BookingStatus,
    SubmitBookingRequest, UpdateBookingNotesRequest, UpdateBookingStatusRequest,
};
pub use business::{
    Business, BusinessSettings, PublicBusinessProfile, RegisterBusinessRequest,
    UpdateBusinessRequest, UpdateSettingsRequest,
};
pub use customer::{
    CreateCustomerRequest, CreateTagRequest, Customer, CustomerTag, CustomerWithTags, TagColor,
    UpdateCustomerRequest,
};
pub use quote::{
    CreateQuoteRequest, Quote, QuoteItem, QuoteItemInput, QuoteStatus, QuoteWithItems,
    UpdateQuoteStatusRequest,
};
pub use service::{CreateServiceRequest, PublicService, Service, UpdateServiceRequest};
pub use staff::{CreateStaffRequest, StaffMember, UpdateStaffRequest};
