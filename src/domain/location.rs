//! Administrative-region reference data and the user's location selection.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::types::{DistrictId, UpazilaId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct District {
    pub id: DistrictId,
    pub name: String,
}

/// Sub-district, linked to its parent through `district_id`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Upazila {
    pub id: UpazilaId,
    #[serde(alias = "district_id")]
    pub district_id: DistrictId,
    pub name: String,
}

/// Errors raised when a selection would break the district/upazila pairing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("an upazila cannot be selected before a district")]
    DistrictMissing,
    #[error("upazila `{upazila}` does not belong to district `{district}`")]
    UpazilaOutsideDistrict { district: String, upazila: String },
}

/// District and upazila names picked in a form or a filter bar.
///
/// An empty district always carries an empty upazila, and moving to another
/// district always clears the upazila.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct LocationSelection {
    district_name: String,
    upazila_name: String,
}

impl LocationSelection {
    /// Empty selection, as found on a freshly mounted form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a selection from raw names, rejecting an upazila without district.
    pub fn try_new(
        district_name: impl Into<String>,
        upazila_name: impl Into<String>,
    ) -> Result<Self, LocationError> {
        Self::new()
            .change_district(district_name)
            .select_upazila(upazila_name)
    }

    pub fn district_name(&self) -> &str {
        &self.district_name
    }

    pub fn upazila_name(&self) -> &str {
        &self.upazila_name
    }

    pub fn is_empty(&self) -> bool {
        self.district_name.is_empty()
    }

    /// Moves to `district_name`, unconditionally dropping the upazila.
    #[must_use]
    pub fn change_district(&self, district_name: impl Into<String>) -> Self {
        Self {
            district_name: district_name.into(),
            upazila_name: String::new(),
        }
    }

    /// Picks an upazila inside the current district. An empty name clears it.
    pub fn select_upazila(&self, upazila_name: impl Into<String>) -> Result<Self, LocationError> {
        let upazila_name = upazila_name.into().trim().to_string();
        if !upazila_name.is_empty() && self.district_name.is_empty() {
            return Err(LocationError::DistrictMissing);
        }
        Ok(Self {
            district_name: self.district_name.clone(),
            upazila_name,
        })
    }

    /// Drops the upazila while keeping the district.
    #[must_use]
    pub fn without_upazila(&self) -> Self {
        self.change_district(self.district_name.clone())
    }
}
