use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use validator::Validate;

use crate::domain::donation_request::{NewDonationRequest, hour_minute};
use crate::domain::types::{BloodGroup, PersonName};
use crate::domain::user::User;
use crate::forms::{FormError, resolve_location};
use crate::location::ReferenceData;

/// Raw input of the "create donation request" page.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequestForm {
    #[validate(length(min = 1, max = 100))]
    pub recipient_name: String,
    #[validate(length(min = 1))]
    pub recipient_district: String,
    #[validate(length(min = 1))]
    pub recipient_upazila: String,
    #[validate(length(min = 1, max = 200))]
    pub hospital_name: String,
    #[validate(length(min = 1, max = 300))]
    pub full_address: String,
    pub blood_group: String,
    /// `YYYY-MM-DD`
    pub donation_date: String,
    /// `HH:MM`
    pub donation_time: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub request_message: String,
}

impl DonationRequestForm {
    /// Validates the form and builds the payload posted on behalf of `requester`.
    pub fn into_new_request(
        self,
        requester: &User,
        reference: &ReferenceData,
    ) -> Result<NewDonationRequest, FormError> {
        self.validate()?;

        let location = resolve_location(
            &self.recipient_district,
            &self.recipient_upazila,
            reference,
        )?;
        let blood_group: BloodGroup = self
            .blood_group
            .parse()
            .map_err(|_| FormError::InvalidBloodGroup)?;
        let donation_date = NaiveDate::parse_from_str(self.donation_date.trim(), "%Y-%m-%d")
            .map_err(|_| FormError::InvalidDate)?;
        let donation_time = NaiveTime::parse_from_str(self.donation_time.trim(), hour_minute::FORMAT)
            .map_err(|_| FormError::InvalidTime)?;
        let message = self.request_message.trim();

        Ok(NewDonationRequest {
            requester_name: requester.name.clone(),
            requester_email: requester.email.clone(),
            recipient_name: PersonName::new(self.recipient_name)
                .map_err(|_| FormError::InvalidName)?,
            district: location.district_name().to_string(),
            upazila: location.upazila_name().to_string(),
            hospital_name: self.hospital_name.trim().to_string(),
            full_address: self.full_address.trim().to_string(),
            blood_group,
            donation_date,
            donation_time,
            request_message: (!message.is_empty()).then(|| message.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::location::{District, LocationError, Upazila};
    use crate::domain::types::{DistrictId, Email, RecordId, UpazilaId};
    use crate::domain::user::{Role, UserStatus};

    fn requester() -> User {
        User {
            id: RecordId::new("u1").unwrap(),
            name: PersonName::new("Rahim").unwrap(),
            email: Email::new("rahim@example.com").unwrap(),
            avatar: None,
            blood_group: None,
            district: None,
            upazila: None,
            role: Role::Donor,
            status: UserStatus::Active,
        }
    }

    fn reference() -> ReferenceData {
        ReferenceData::new(
            vec![
                District {
                    id: DistrictId::new(1).unwrap(),
                    name: "Dhaka".to_string(),
                },
                District {
                    id: DistrictId::new(2).unwrap(),
                    name: "Gazipur".to_string(),
                },
            ],
            vec![
                Upazila {
                    id: UpazilaId::new(10).unwrap(),
                    district_id: DistrictId::new(1).unwrap(),
                    name: "Savar".to_string(),
                },
                Upazila {
                    id: UpazilaId::new(20).unwrap(),
                    district_id: DistrictId::new(2).unwrap(),
                    name: "Sreepur".to_string(),
                },
            ],
        )
    }

    fn form() -> DonationRequestForm {
        DonationRequestForm {
            recipient_name: "Karim".to_string(),
            recipient_district: "Dhaka".to_string(),
            recipient_upazila: "Savar".to_string(),
            hospital_name: " Enam Medical ".to_string(),
            full_address: "Savar, Dhaka".to_string(),
            blood_group: "o+".to_string(),
            donation_date: "2026-11-02".to_string(),
            donation_time: "09:30".to_string(),
            request_message: "  ".to_string(),
        }
    }

    #[test]
    fn valid_form_builds_request() {
        let request = form().into_new_request(&requester(), &reference()).unwrap();

        assert_eq!(request.requester_email.as_str(), "rahim@example.com");
        assert_eq!(request.upazila, "Savar");
        assert_eq!(request.hospital_name, "Enam Medical");
        assert_eq!(request.blood_group, BloodGroup::OPositive);
        assert!(request.request_message.is_none());
    }

    #[test]
    fn cross_district_upazila_is_rejected() {
        let mut form = form();
        form.recipient_upazila = "Sreepur".to_string();

        let result = form.into_new_request(&requester(), &reference());

        assert!(matches!(
            result,
            Err(FormError::Location(LocationError::UpazilaOutsideDistrict { .. }))
        ));
    }

    #[test]
    fn empty_fields_fail_validation() {
        let mut form = form();
        form.recipient_name = String::new();

        let result = form.into_new_request(&requester(), &reference());

        assert!(matches!(result, Err(FormError::Validation(_))));
    }

    #[test]
    fn malformed_time_is_rejected() {
        let mut form = form();
        form.donation_time = "9.30am".to_string();

        let result = form.into_new_request(&requester(), &reference());

        assert!(matches!(result, Err(FormError::InvalidTime)));
    }

    #[test]
    fn location_unchecked_without_reference_data() {
        let mut form = form();
        form.recipient_upazila = "Sreepur".to_string();

        let request = form
            .into_new_request(&requester(), &ReferenceData::default())
            .unwrap();

        assert_eq!(request.district, "Dhaka");
    }
}
