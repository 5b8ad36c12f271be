//! Form definitions backing the request and profile pages.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::location::{LocationError, LocationSelection};
use crate::location::ReferenceData;

pub mod donation_request;
pub mod profile;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Location(#[from] LocationError),

    #[error("district and upazila are required")]
    MissingLocation,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid url")]
    InvalidUrl,

    #[error("invalid blood group")]
    InvalidBloodGroup,

    #[error("invalid donation date")]
    InvalidDate,

    #[error("invalid donation time")]
    InvalidTime,
}

/// Builds a complete district/upazila pair and checks it against reference data.
///
/// Without loaded reference data the pair cannot be verified and is accepted.
fn resolve_location(
    district: &str,
    upazila: &str,
    reference: &ReferenceData,
) -> Result<LocationSelection, FormError> {
    let selection = LocationSelection::try_new(district.trim(), upazila.trim())?;
    if selection.is_empty() || selection.upazila_name().is_empty() {
        return Err(FormError::MissingLocation);
    }
    if reference.is_loaded() {
        reference.check(&selection)?;
    } else {
        log::warn!("Reference data unavailable, accepting location unchecked");
    }
    Ok(selection)
}
