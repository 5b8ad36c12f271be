//! District → upazila dependent selection.
//!
//! Every page that offers a district and an upazila picker goes through this
//! module: the valid upazilas are always derived from the selected district
//! and the loaded reference data, and changing the district always clears the
//! upazila so a district/upazila pair can never be geographically inconsistent.

use std::sync::Arc;

use crate::domain::location::{District, LocationError, LocationSelection, Upazila};
use crate::domain::types::DistrictId;

/// Upazilas of the first district named `district_name`, in source order.
///
/// Unknown or empty names yield an empty list, as does empty reference data.
pub fn upazilas_for<'a>(
    district_name: &str,
    districts: &[District],
    upazilas: &'a [Upazila],
) -> Vec<&'a Upazila> {
    match districts.iter().find(|d| d.name == district_name) {
        Some(district) => upazilas_in(district.id, upazilas),
        None => Vec::new(),
    }
}

/// Upazilas whose parent is `district_id`, in source order.
pub fn upazilas_in(district_id: DistrictId, upazilas: &[Upazila]) -> Vec<&Upazila> {
    upazilas
        .iter()
        .filter(|u| u.district_id == district_id)
        .collect()
}

/// Selection after the user picks `new_district_name`; the upazila is always cleared.
pub fn on_district_change(new_district_name: &str, current: &LocationSelection) -> LocationSelection {
    current.change_district(new_district_name)
}

/// Read-only district and upazila lists, shared between consumers.
#[derive(Clone, Debug, Default)]
pub struct ReferenceData {
    districts: Arc<[District]>,
    upazilas: Arc<[Upazila]>,
}

impl ReferenceData {
    pub fn new(districts: Vec<District>, upazilas: Vec<Upazila>) -> Self {
        Self {
            districts: districts.into(),
            upazilas: upazilas.into(),
        }
    }

    pub fn districts(&self) -> &[District] {
        &self.districts
    }

    pub fn upazilas(&self) -> &[Upazila] {
        &self.upazilas
    }

    pub fn is_loaded(&self) -> bool {
        !self.districts.is_empty()
    }

    pub fn upazilas_for(&self, district_name: &str) -> Vec<&Upazila> {
        upazilas_for(district_name, &self.districts, &self.upazilas)
    }

    pub fn upazilas_in(&self, district_id: DistrictId) -> Vec<&Upazila> {
        upazilas_in(district_id, &self.upazilas)
    }

    /// Checks that the selected upazila, if any, lies inside the selected district.
    pub fn check(&self, selection: &LocationSelection) -> Result<(), LocationError> {
        let upazila = selection.upazila_name();
        if upazila.is_empty() {
            return Ok(());
        }
        if self
            .upazilas_for(selection.district_name())
            .iter()
            .any(|u| u.name == upazila)
        {
            Ok(())
        } else {
            Err(LocationError::UpazilaOutsideDistrict {
                district: selection.district_name().to_string(),
                upazila: upazila.to_string(),
            })
        }
    }

    pub fn is_consistent(&self, selection: &LocationSelection) -> bool {
        self.check(selection).is_ok()
    }
}

/// Selection state of one district/upazila picker pair.
///
/// The list of offered upazilas depends on both the selection and the
/// reference data, so it is recomputed whenever either of them changes.
#[derive(Clone, Debug, Default)]
pub struct LocationPicker {
    reference: ReferenceData,
    selection: LocationSelection,
    available: Vec<Upazila>,
}

impl LocationPicker {
    pub fn new(reference: ReferenceData) -> Self {
        Self {
            reference,
            ..Self::default()
        }
    }

    pub fn selection(&self) -> &LocationSelection {
        &self.selection
    }

    pub fn districts(&self) -> &[District] {
        self.reference.districts()
    }

    /// Upazilas offered for the currently selected district.
    pub fn available_upazilas(&self) -> &[Upazila] {
        &self.available
    }

    pub fn select_district(&mut self, district_name: &str) {
        self.selection = on_district_change(district_name, &self.selection);
        self.refresh();
    }

    /// Picks an upazila; it must belong to the current district once reference data is loaded.
    pub fn select_upazila(&mut self, upazila_name: &str) -> Result<(), LocationError> {
        let candidate = self.selection.select_upazila(upazila_name)?;
        if self.reference.is_loaded() {
            self.reference.check(&candidate)?;
        }
        self.selection = candidate;
        Ok(())
    }

    /// Installs reference data that arrived after the picker was created.
    pub fn set_reference(&mut self, reference: ReferenceData) {
        self.reference = reference;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.available = self
            .reference
            .upazilas_for(self.selection.district_name())
            .into_iter()
            .cloned()
            .collect();
        let upazila = self.selection.upazila_name();
        if self.reference.is_loaded()
            && !upazila.is_empty()
            && !self.available.iter().any(|u| u.name == upazila)
        {
            log::debug!(
                "Clearing upazila `{upazila}` not found under district `{}`",
                self.selection.district_name()
            );
            self.selection = self.selection.without_upazila();
        }
    }
}
