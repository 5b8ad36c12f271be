//! Domain types shared by the list controller, forms and services.

pub mod criteria;
pub mod donation_request;
pub mod location;
pub mod page;
pub mod session;
pub mod types;
pub mod user;
