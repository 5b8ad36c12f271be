use crate::domain::session::Session;
use crate::domain::types::RecordId;
use crate::domain::user::{ProfileUpdate, Role, User, UserStatus};
use crate::forms::profile::ProfileForm;
use crate::location::ReferenceData;
use crate::services::{ServiceError, ServiceResult, active_user};
use crate::source::UserWriter;

/// Signed-in admin of the session, who must not be acting on themselves.
fn admin_acting_on<'a>(session: &'a Session, target: &RecordId) -> ServiceResult<&'a User> {
    let user = active_user(session)?;
    if !user.is_admin() || &user.id == target {
        return Err(ServiceError::Unauthorized);
    }
    Ok(user)
}

/// Saves the signed-in user's own profile.
pub async fn update_profile<W>(
    writer: &W,
    session: &Session,
    reference: &ReferenceData,
    form: ProfileForm,
) -> ServiceResult<User>
where
    W: UserWriter + ?Sized,
{
    active_user(session)?;

    let update = ProfileUpdate::try_from((form, reference)).map_err(|err| {
        log::error!("Failed to validate profile form: {err}");
        ServiceError::Form(err.to_string())
    })?;

    writer.update_profile(&update).await.map_err(|err| {
        log::error!("Failed to update profile: {err}");
        ServiceError::from(err)
    })
}

/// Blocks or unblocks a user. Admin only.
pub async fn set_user_status<W>(
    writer: &W,
    session: &Session,
    user_id: &RecordId,
    status: UserStatus,
) -> ServiceResult<User>
where
    W: UserWriter + ?Sized,
{
    admin_acting_on(session, user_id)?;

    writer
        .update_user_status(user_id, status)
        .await
        .map_err(|err| {
            log::error!("Failed to set status of user {user_id}: {err}");
            ServiceError::from(err)
        })
}

/// Promotes or demotes a user. Admin only.
pub async fn set_user_role<W>(
    writer: &W,
    session: &Session,
    user_id: &RecordId,
    role: Role,
) -> ServiceResult<User>
where
    W: UserWriter + ?Sized,
{
    admin_acting_on(session, user_id)?;

    writer.update_user_role(user_id, role).await.map_err(|err| {
        log::error!("Failed to set role of user {user_id}: {err}");
        ServiceError::from(err)
    })
}
