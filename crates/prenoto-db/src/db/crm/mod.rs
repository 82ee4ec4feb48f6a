pub mod customer;
pub mod quote;
pub mod tag;

pub use customer::CustomerRepository;
pub use quote::QuoteRepository;
pub use tag::TagRepository;
