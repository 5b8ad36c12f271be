use serde::{Deserialize, Serialize};

use crate::domain::types::{AvatarUrl, BloodGroup, Email, PersonName, RecordId};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Donor,
    Volunteer,
    Admin,
}

impl Role {
    /// Volunteers and admins may triage any donation request.
    pub fn can_moderate_requests(self) -> bool {
        matches!(self, Role::Volunteer | Role::Admin)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Blocked,
}

/// Canonical platform user, whatever shape the backend sent it in.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: RecordId,
    pub name: PersonName,
    pub email: Email,
    pub avatar: Option<AvatarUrl>,
    pub blood_group: Option<BloodGroup>,
    pub district: Option<String>,
    pub upazila: Option<String>,
    pub role: Role,
    pub status: UserStatus,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_blocked(&self) -> bool {
        self.status == UserStatus::Blocked
    }
}

/// Self-service profile changes.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: PersonName,
    pub avatar: Option<AvatarUrl>,
    pub blood_group: BloodGroup,
    pub district: String,
    pub upazila: String,
}
