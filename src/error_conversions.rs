//! Error conversion glue for `client` feature consumers.
//!
//! The domain layer must not depend on source/service error types, but the
//! layers above still want `?` to work on constrained value construction.

use crate::domain::types::TypeConstraintError;
use crate::services::ServiceError;
use crate::source::errors::SourceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<TypeConstraintError> for SourceError {
    fn from(val: TypeConstraintError) -> Self {
        SourceError::ValidationError(val.to_string())
    }
}
