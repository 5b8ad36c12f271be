//! Client core of the blood-donation coordination platform.
//!
//! The `data` feature carries the domain model, the district/upazila resolver,
//! forms and wire DTOs. The `client` feature adds the debounced list
//! controller, the REST sources and the service layer.

pub mod domain;
pub mod dto;
pub mod forms;
pub mod location;
pub mod pagination;

#[cfg(feature = "client")]
pub mod controller;
#[cfg(feature = "client")]
pub mod error_conversions;
#[cfg(feature = "client")]
pub mod models;
#[cfg(feature = "client")]
pub mod services;
#[cfg(feature = "client")]
pub mod source;
