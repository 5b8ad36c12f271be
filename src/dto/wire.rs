//! JSON shapes returned by the REST backend and their normalization.
//!
//! The backend is loose about field names (`_id` vs `id`, `displayName` vs
//! `name`, `photoURL` vs `avatar`). Everything is funnelled into the canonical
//! domain records here so nothing downstream deals with optional spellings.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::domain::donation_request::{DonationRequest, DonorInfo, RequestStatus, hour_minute};
use crate::domain::location::{District, Upazila};
use crate::domain::page::PageResult;
use crate::domain::types::{
    AvatarUrl, BloodGroup, DistrictId, Email, NonEmptyString, PersonName, RecordId,
    TypeConstraintError, UpazilaId,
};
use crate::domain::user::{Role, User, UserStatus};

/// Wire records that can be turned into a canonical domain record.
pub trait Normalize {
    type Output;

    fn normalize(self) -> Result<Self::Output, TypeConstraintError>;
}

/// Ids arrive either as strings or as numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(i64),
}

impl WireId {
    fn into_record_id(self) -> Result<RecordId, TypeConstraintError> {
        match self {
            WireId::Text(text) => RecordId::new(text),
            WireId::Number(number) => RecordId::new(number.to_string()),
        }
    }

    fn into_number(self) -> Result<i64, TypeConstraintError> {
        match self {
            WireId::Number(number) => Ok(number),
            WireId::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| TypeConstraintError::InvalidValue(format!("numeric id `{text}`"))),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn required(value: Option<String>, field: &str) -> Result<String, TypeConstraintError> {
    non_blank(value).ok_or_else(|| TypeConstraintError::InvalidValue(format!("missing {field}")))
}

fn parse_blood_group(value: Option<String>) -> Result<Option<BloodGroup>, TypeConstraintError> {
    non_blank(value).map(|s| s.parse()).transpose()
}

#[derive(Debug, Deserialize)]
pub struct DistrictWire {
    pub id: WireId,
    pub name: String,
}

impl Normalize for DistrictWire {
    type Output = District;

    fn normalize(self) -> Result<District, TypeConstraintError> {
        Ok(District {
            id: DistrictId::new(self.id.into_number()?)?,
            name: NonEmptyString::new(self.name)?.into_inner(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpazilaWire {
    pub id: WireId,
    #[serde(alias = "district_id")]
    pub district_id: WireId,
    pub name: String,
}

impl Normalize for UpazilaWire {
    type Output = Upazila;

    fn normalize(self) -> Result<Upazila, TypeConstraintError> {
        Ok(Upazila {
            id: UpazilaId::new(self.id.into_number()?)?,
            district_id: DistrictId::new(self.district_id.into_number()?)?,
            name: NonEmptyString::new(self.name)?.into_inner(),
        })
    }
}

/// Normalizes a whole collection, dropping and logging the items that fail.
pub fn normalize_all<W: Normalize>(items: Vec<W>) -> Vec<W::Output> {
    items
        .into_iter()
        .filter_map(|item| match item.normalize() {
            Ok(record) => Some(record),
            Err(err) => {
                log::warn!("Dropping malformed record: {err}");
                None
            }
        })
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWire {
    #[serde(alias = "_id")]
    pub id: Option<WireId>,
    pub display_name: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "photoURL", alias = "photoUrl")]
    pub avatar: Option<String>,
    pub blood_group: Option<String>,
    pub district: Option<String>,
    pub upazila: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}

impl Normalize for UserWire {
    type Output = User;

    fn normalize(self) -> Result<User, TypeConstraintError> {
        let id = self
            .id
            .ok_or_else(|| TypeConstraintError::InvalidValue("missing id".to_string()))?
            .into_record_id()?;
        let name = non_blank(self.display_name)
            .or_else(|| non_blank(self.name))
            .ok_or(TypeConstraintError::EmptyString)?;
        // A malformed avatar is cosmetic; drop it rather than the whole user.
        let avatar = non_blank(self.avatar).and_then(|url| AvatarUrl::new(url).ok());

        Ok(User {
            id,
            name: PersonName::new(name)?,
            email: Email::new(required(self.email, "email")?)?,
            avatar,
            blood_group: parse_blood_group(self.blood_group)?,
            district: non_blank(self.district),
            upazila: non_blank(self.upazila),
            role: self.role.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorWire {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequestWire {
    #[serde(alias = "_id")]
    pub id: Option<WireId>,
    pub requester_name: Option<String>,
    pub requester_email: Option<String>,
    pub recipient_name: Option<String>,
    #[serde(alias = "district")]
    pub recipient_district: Option<String>,
    #[serde(alias = "upazila")]
    pub recipient_upazila: Option<String>,
    pub hospital_name: Option<String>,
    pub full_address: Option<String>,
    pub blood_group: Option<String>,
    pub donation_date: Option<String>,
    pub donation_time: Option<String>,
    #[serde(alias = "message")]
    pub request_message: Option<String>,
    #[serde(alias = "donationStatus")]
    pub status: Option<RequestStatus>,
    pub donor: Option<DonorWire>,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
}

impl Normalize for DonationRequestWire {
    type Output = DonationRequest;

    fn normalize(self) -> Result<DonationRequest, TypeConstraintError> {
        let id = self
            .id
            .ok_or_else(|| TypeConstraintError::InvalidValue("missing id".to_string()))?
            .into_record_id()?;

        let date = required(self.donation_date, "donation date")?;
        // Dates sometimes come back as full ISO timestamps.
        let donation_date = NaiveDate::parse_from_str(date.get(..10).unwrap_or(&date), "%Y-%m-%d")
            .map_err(|_| TypeConstraintError::InvalidValue(format!("donation date `{date}`")))?;
        let time = required(self.donation_time, "donation time")?;
        let donation_time = NaiveTime::parse_from_str(&time, hour_minute::FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&time, "%H:%M:%S"))
            .map_err(|_| TypeConstraintError::InvalidValue(format!("donation time `{time}`")))?;

        let (donor_name, donor_email) = match self.donor {
            Some(donor) => (donor.name, donor.email),
            None => (self.donor_name, self.donor_email),
        };
        let donor = match (non_blank(donor_name), non_blank(donor_email)) {
            (Some(name), Some(email)) => Some(DonorInfo {
                name: PersonName::new(name)?,
                email: Email::new(email)?,
            }),
            _ => None,
        };

        Ok(DonationRequest {
            id,
            requester_name: PersonName::new(required(self.requester_name, "requester name")?)?,
            requester_email: Email::new(required(self.requester_email, "requester email")?)?,
            recipient_name: PersonName::new(required(self.recipient_name, "recipient name")?)?,
            district: required(self.recipient_district, "district")?,
            upazila: required(self.recipient_upazila, "upazila")?,
            hospital_name: non_blank(self.hospital_name).unwrap_or_default(),
            full_address: non_blank(self.full_address).unwrap_or_default(),
            blood_group: parse_blood_group(self.blood_group)?
                .ok_or_else(|| TypeConstraintError::InvalidValue("missing blood group".to_string()))?,
            donation_date,
            donation_time,
            message: non_blank(self.request_message),
            status: self.status.unwrap_or_default(),
            donor,
        })
    }
}

/// Paginated list envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePage<W> {
    #[serde(alias = "data", alias = "donors", alias = "requests", alias = "users")]
    pub items: Vec<W>,
    #[serde(default, alias = "page")]
    pub current_page: Option<usize>,
    #[serde(default)]
    pub total_pages: Option<usize>,
    #[serde(default, alias = "total")]
    pub total_count: Option<usize>,
}

impl<W: Normalize> WirePage<W> {
    /// Normalizes every item, dropping the ones that cannot be normalized.
    ///
    /// Missing pagination metadata is derived from `page` and `limit`: the
    /// count assumes every earlier page was full, and the page count never
    /// falls below the page being shown.
    pub fn into_page(self, page: usize, limit: usize) -> PageResult<W::Output> {
        let limit = limit.max(1);
        let received = self.items.len();
        let items = normalize_all(self.items);
        let current_page = self.current_page.unwrap_or(page).max(1);

        let total_count = self
            .total_count
            .unwrap_or((current_page - 1) * limit + received);
        let mut total_pages = self
            .total_pages
            .unwrap_or_else(|| total_count.div_ceil(limit));
        if total_count > 0 {
            total_pages = total_pages.max(current_page);
        }

        PageResult::new(items, current_page, total_pages, total_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_wins_over_name() {
        let wire: UserWire = serde_json::from_str(
            r#"{"_id":"abc","displayName":"Rahim Uddin","name":"rahim","email":"R@Example.com"}"#,
        )
        .unwrap();

        let user = wire.normalize().unwrap();

        assert_eq!(user.id.as_str(), "abc");
        assert_eq!(user.name.as_str(), "Rahim Uddin");
        assert_eq!(user.email.as_str(), "r@example.com");
        assert_eq!(user.role, Role::Donor);
        assert_eq!(user.status, UserStatus::Active);
    }

    #[test]
    fn blank_display_name_falls_back_to_name() {
        let wire: UserWire = serde_json::from_str(
            r#"{"id":7,"displayName":"  ","name":"Karim","email":"k@example.com","role":"volunteer","bloodGroup":"ab-"}"#,
        )
        .unwrap();

        let user = wire.normalize().unwrap();

        assert_eq!(user.id.as_str(), "7");
        assert_eq!(user.name.as_str(), "Karim");
        assert_eq!(user.role, Role::Volunteer);
        assert_eq!(user.blood_group, Some(BloodGroup::AbNegative));
    }

    #[test]
    fn user_without_any_name_is_rejected() {
        let wire: UserWire =
            serde_json::from_str(r#"{"id":"x","email":"k@example.com"}"#).unwrap();
        assert_eq!(wire.normalize(), Err(TypeConstraintError::EmptyString));
    }

    #[test]
    fn request_normalizes_iso_date_and_flat_donor() {
        let wire: DonationRequestWire = serde_json::from_str(
            r#"{
                "_id": "r1",
                "requesterName": "Rahim",
                "requesterEmail": "rahim@example.com",
                "recipientName": "Karim",
                "recipientDistrict": "Dhaka",
                "recipientUpazila": "Savar",
                "hospitalName": "Enam Medical",
                "fullAddress": "Savar",
                "bloodGroup": "B+",
                "donationDate": "2026-11-02T00:00:00.000Z",
                "donationTime": "14:15",
                "status": "inprogress",
                "donorName": "Jamal",
                "donorEmail": "jamal@example.com"
            }"#,
        )
        .unwrap();

        let request = wire.normalize().unwrap();

        assert_eq!(request.donation_date, NaiveDate::from_ymd_opt(2026, 11, 2).unwrap());
        assert_eq!(request.donation_time, NaiveTime::from_hms_opt(14, 15, 0).unwrap());
        assert_eq!(request.status, RequestStatus::Inprogress);
        assert_eq!(request.donor.unwrap().name.as_str(), "Jamal");
    }

    #[test]
    fn page_drops_malformed_items_and_derives_totals() {
        let wire: WirePage<UserWire> = serde_json::from_str(
            r#"{"users":[
                {"id":"1","name":"A","email":"a@example.com"},
                {"id":"2","email":"b@example.com"},
                {"id":"3","name":"C","email":"c@example.com"}
            ],"total":23}"#,
        )
        .unwrap();

        let page = wire.into_page(2, 10);

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total_count, 23);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn later_page_without_totals_stays_consistent() {
        let wire: WirePage<UserWire> = serde_json::from_str(
            r#"{"users":[{"id":"21","name":"U","email":"u@example.com"}]}"#,
        )
        .unwrap();

        let page = wire.into_page(3, 10);

        assert_eq!(page.current_page, 3);
        assert_eq!(page.total_count, 21);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn empty_first_page_without_totals() {
        let wire: WirePage<UserWire> = serde_json::from_str(r#"{"users":[]}"#).unwrap();

        let page = wire.into_page(1, 10);

        assert_eq!(page.current_page, 1);
        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn reference_ids_accept_strings() {
        let districts: Vec<DistrictWire> =
            serde_json::from_str(r#"[{"id":"1","name":"Dhaka"},{"id":"x","name":"Bad"}]"#).unwrap();
        let upazilas: Vec<UpazilaWire> =
            serde_json::from_str(r#"[{"id":"10","district_id":"1","name":"Savar"}]"#).unwrap();

        let districts = normalize_all(districts);
        let upazilas = normalize_all(upazilas);

        assert_eq!(districts.len(), 1);
        assert_eq!(districts[0].id.get(), 1);
        assert_eq!(upazilas[0].district_id.get(), 1);
    }
}
