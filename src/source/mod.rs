//! Collaborators the client talks to: list endpoints, reference data and writers.

use async_trait::async_trait;

use crate::domain::donation_request::{DonationRequest, NewDonationRequest, RequestStatus};
use crate::domain::location::{District, Upazila};
use crate::domain::page::PageResult;
use crate::domain::types::RecordId;
use crate::domain::user::{ProfileUpdate, Role, User, UserStatus};
use crate::dto::lists::ListQuery;
use crate::source::errors::SourceResult;

pub mod errors;
pub mod http;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

pub use http::ApiClient;

/// One paginated, filterable list of records.
#[async_trait]
pub trait ListSource<T>: Send + Sync {
    async fn fetch_page(&self, query: &ListQuery) -> SourceResult<PageResult<T>>;
}

#[async_trait]
pub trait ReferenceSource: Send + Sync {
    async fn fetch_districts(&self) -> SourceResult<Vec<District>>;
    async fn fetch_upazilas(&self) -> SourceResult<Vec<Upazila>>;
}

#[async_trait]
pub trait RequestWriter: Send + Sync {
    async fn create_request(&self, request: &NewDonationRequest) -> SourceResult<DonationRequest>;
    async fn update_request_status(
        &self,
        id: &RecordId,
        status: RequestStatus,
    ) -> SourceResult<DonationRequest>;
    async fn delete_request(&self, id: &RecordId) -> SourceResult<()>;
}

#[async_trait]
pub trait UserWriter: Send + Sync {
    async fn update_profile(&self, update: &ProfileUpdate) -> SourceResult<User>;
    async fn update_user_status(&self, id: &RecordId, status: UserStatus) -> SourceResult<User>;
    async fn update_user_role(&self, id: &RecordId, role: Role) -> SourceResult<User>;
}
