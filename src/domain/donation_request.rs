use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{BloodGroup, Email, PersonName, RecordId};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    #[serde(alias = "in-progress", alias = "in_progress")]
    Inprogress,
    Done,
    #[serde(alias = "cancelled")]
    Canceled,
}

impl RequestStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Inprogress => "inprogress",
            RequestStatus::Done => "done",
            RequestStatus::Canceled => "canceled",
        }
    }

    /// Done and canceled requests accept no further transitions.
    pub fn is_closed(self) -> bool {
        matches!(self, RequestStatus::Done | RequestStatus::Canceled)
    }
}

/// Donor who accepted a request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DonorInfo {
    pub name: PersonName,
    pub email: Email,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DonationRequest {
    pub id: RecordId,
    pub requester_name: PersonName,
    pub requester_email: Email,
    pub recipient_name: PersonName,
    pub district: String,
    pub upazila: String,
    pub hospital_name: String,
    pub full_address: String,
    pub blood_group: BloodGroup,
    pub donation_date: NaiveDate,
    pub donation_time: NaiveTime,
    pub message: Option<String>,
    pub status: RequestStatus,
    pub donor: Option<DonorInfo>,
}

/// Payload for posting a new donation request. Always starts as pending.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewDonationRequest {
    pub requester_name: PersonName,
    pub requester_email: Email,
    pub recipient_name: PersonName,
    #[serde(rename = "recipientDistrict")]
    pub district: String,
    #[serde(rename = "recipientUpazila")]
    pub upazila: String,
    pub hospital_name: String,
    pub full_address: String,
    pub blood_group: BloodGroup,
    pub donation_date: NaiveDate,
    #[serde(with = "hour_minute")]
    pub donation_time: NaiveTime,
    pub request_message: Option<String>,
}

pub(crate) mod hour_minute {
    use chrono::NaiveTime;
    use serde::Serializer;

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }
}
