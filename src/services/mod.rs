//! Use-case layer on top of the sources: permission checks, form handling and
//! graceful degradation.

use thiserror::Error;

use crate::domain::session::Session;
use crate::domain::user::User;
use crate::source::errors::SourceError;

pub mod lists;
pub mod reference;
pub mod requests;
pub mod users;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("form error: {0}")]
    Form(String),

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    #[error("backend error: {0}")]
    Source(SourceError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<SourceError> for ServiceError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NotFound => ServiceError::NotFound,
            SourceError::Unauthorized => ServiceError::Unauthorized,
            other => ServiceError::Source(other),
        }
    }
}

/// Signed-in, non-blocked user of the session.
fn active_user(session: &Session) -> ServiceResult<&User> {
    match session.user() {
        Some(user) if !user.is_blocked() => Ok(user),
        _ => Err(ServiceError::Unauthorized),
    }
}
