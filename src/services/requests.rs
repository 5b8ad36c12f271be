use crate::domain::donation_request::{DonationRequest, RequestStatus};
use crate::domain::session::Session;
use crate::domain::user::User;
use crate::forms::donation_request::DonationRequestForm;
use crate::location::ReferenceData;
use crate::services::{ServiceError, ServiceResult, active_user};
use crate::source::RequestWriter;

fn is_requester(user: &User, request: &DonationRequest) -> bool {
    user.email == request.requester_email
}

/// Whether `user` may move `request` to `status`.
///
/// Moderators may apply any change to an open request. Requesters may only
/// close their own in-progress request as done or canceled.
pub fn can_change_status(user: &User, request: &DonationRequest, status: RequestStatus) -> bool {
    if request.status.is_closed() || request.status == status {
        return false;
    }
    if user.role.can_moderate_requests() {
        return true;
    }
    is_requester(user, request)
        && request.status == RequestStatus::Inprogress
        && status.is_closed()
}

/// Validates the form and posts a new pending request for the signed-in user.
pub async fn submit_donation_request<W>(
    writer: &W,
    session: &Session,
    reference: &ReferenceData,
    form: DonationRequestForm,
) -> ServiceResult<DonationRequest>
where
    W: RequestWriter + ?Sized,
{
    let user = active_user(session)?;

    let new_request = form.into_new_request(user, reference).map_err(|err| {
        log::error!("Failed to validate donation request form: {err}");
        ServiceError::Form(err.to_string())
    })?;

    writer.create_request(&new_request).await.map_err(|err| {
        log::error!("Failed to create donation request: {err}");
        ServiceError::from(err)
    })
}

pub async fn change_request_status<W>(
    writer: &W,
    session: &Session,
    request: &DonationRequest,
    status: RequestStatus,
) -> ServiceResult<DonationRequest>
where
    W: RequestWriter + ?Sized,
{
    let user = active_user(session)?;
    if !can_change_status(user, request, status) {
        return Err(ServiceError::Unauthorized);
    }

    writer
        .update_request_status(&request.id, status)
        .await
        .map_err(|err| {
            log::error!("Failed to update request {}: {err}", request.id);
            ServiceError::from(err)
        })
}

/// Deletes a request. Only its requester or an admin may do so.
pub async fn delete_donation_request<W>(
    writer: &W,
    session: &Session,
    request: &DonationRequest,
) -> ServiceResult<()>
where
    W: RequestWriter + ?Sized,
{
    let user = active_user(session)?;
    if !(user.is_admin() || is_requester(user, request)) {
        return Err(ServiceError::Unauthorized);
    }

    writer.delete_request(&request.id).await.map_err(|err| {
        log::error!("Failed to delete request {}: {err}", request.id);
        ServiceError::from(err)
    })
}
