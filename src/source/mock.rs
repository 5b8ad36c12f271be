//! Mock source implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::donation_request::{DonationRequest, NewDonationRequest, RequestStatus};
use crate::domain::location::{District, Upazila};
use crate::domain::types::RecordId;
use crate::domain::user::{ProfileUpdate, Role, User, UserStatus};
use crate::source::errors::SourceResult;
use crate::source::{ReferenceSource, RequestWriter, UserWriter};

mock! {
    pub Backend {}

    #[async_trait]
    impl ReferenceSource for Backend {
        async fn fetch_districts(&self) -> SourceResult<Vec<District>>;
        async fn fetch_upazilas(&self) -> SourceResult<Vec<Upazila>>;
    }

    #[async_trait]
    impl RequestWriter for Backend {
        async fn create_request(&self, request: &NewDonationRequest) -> SourceResult<DonationRequest>;
        async fn update_request_status(
            &self,
            id: &RecordId,
            status: RequestStatus,
        ) -> SourceResult<DonationRequest>;
        async fn delete_request(&self, id: &RecordId) -> SourceResult<()>;
    }

    #[async_trait]
    impl UserWriter for Backend {
        async fn update_profile(&self, update: &ProfileUpdate) -> SourceResult<User>;
        async fn update_user_status(&self, id: &RecordId, status: UserStatus) -> SourceResult<User>;
        async fn update_user_role(&self, id: &RecordId, role: Role) -> SourceResult<User>;
    }
}
