use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{AvatarUrl, PersonName};
use crate::domain::user::ProfileUpdate;
use crate::forms::{FormError, resolve_location};
use crate::location::ReferenceData;

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    pub blood_group: String,
    pub district: String,
    pub upazila: String,
}

impl TryFrom<(ProfileForm, &ReferenceData)> for ProfileUpdate {
    type Error = FormError;

    fn try_from((form, reference): (ProfileForm, &ReferenceData)) -> Result<Self, Self::Error> {
        form.validate()?;
        let location = resolve_location(&form.district, &form.upazila, reference)?;
        let avatar = match form.avatar.trim() {
            "" => None,
            url => Some(AvatarUrl::new(url).map_err(|_| FormError::InvalidUrl)?),
        };

        Ok(ProfileUpdate {
            name: PersonName::new(form.name).map_err(|_| FormError::InvalidName)?,
            avatar,
            blood_group: form
                .blood_group
                .parse()
                .map_err(|_| FormError::InvalidBloodGroup)?,
            district: location.district_name().to_string(),
            upazila: location.upazila_name().to_string(),
        })
    }
}
