//! List pages and their filter presets.

use std::sync::Arc;

use crate::controller::ListHandle;
use crate::controller::driver::ControllerError;
use crate::domain::criteria::FilterCriteria;
use crate::domain::session::Session;
use crate::domain::user::Role;
use crate::location::LocationPicker;
use crate::models::config::ClientConfig;
use crate::services::{ServiceError, ServiceResult};
use crate::source::ListSource;

pub const DISTRICT_KEY: &str = "district";
pub const UPAZILA_KEY: &str = "upazila";

/// Every paginated, filterable list the client shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListPage {
    /// Public donor search by blood group and location.
    DonorSearch,
    /// Requests posted by the signed-in user.
    MyDonationRequests,
    /// All requests, for volunteers and admins.
    AllDonationRequests,
    /// All users, for admins.
    AllUsers,
}

impl ListPage {
    pub const fn filter_keys(self) -> &'static [&'static str] {
        match self {
            ListPage::DonorSearch => &["bloodGroup", DISTRICT_KEY, UPAZILA_KEY],
            ListPage::MyDonationRequests | ListPage::AllDonationRequests => &["status"],
            ListPage::AllUsers => &["status", "searchText"],
        }
    }

    pub const fn endpoint(self) -> &'static str {
        match self {
            ListPage::DonorSearch => "donors/search",
            ListPage::MyDonationRequests => "donation-requests/mine",
            ListPage::AllDonationRequests => "donation-requests",
            ListPage::AllUsers => "users",
        }
    }

    pub fn criteria(self) -> FilterCriteria {
        FilterCriteria::with_keys(self.filter_keys().iter().copied())
    }

    pub fn is_allowed(self, session: &Session) -> bool {
        let role = session
            .user()
            .filter(|user| !user.is_blocked())
            .map(|user| user.role);
        match self {
            ListPage::DonorSearch => true,
            ListPage::MyDonationRequests => role.is_some(),
            ListPage::AllDonationRequests => role.is_some_and(Role::can_moderate_requests),
            ListPage::AllUsers => role == Some(Role::Admin),
        }
    }
}

/// Starts the list controller for `page` once the session may see it.
pub fn open_list<T, S>(
    page: ListPage,
    session: &Session,
    source: Arc<S>,
    config: &ClientConfig,
) -> ServiceResult<ListHandle<T>>
where
    T: Clone + Send + Sync + 'static,
    S: ListSource<T> + ?Sized + 'static,
{
    if !page.is_allowed(session) {
        return Err(ServiceError::Unauthorized);
    }
    log::info!("Opening list {page:?}");
    Ok(ListHandle::spawn(
        page.criteria(),
        source,
        config.page_limit,
        config.debounce(),
    ))
}

/// Applies a district pick to both the picker and the list filters.
///
/// The upazila filter is cleared in the same step so the list never queries
/// an upazila from another district.
pub fn select_district_filter<T>(
    handle: &ListHandle<T>,
    picker: &mut LocationPicker,
    district_name: &str,
) -> Result<(), ControllerError>
where
    T: Clone + Send + Sync + 'static,
{
    picker.select_district(district_name);
    handle.set_criterion(DISTRICT_KEY, picker.selection().district_name())?;
    handle.set_criterion(UPAZILA_KEY, "")
}

/// Applies an upazila pick if it belongs to the selected district.
pub fn select_upazila_filter<T>(
    handle: &ListHandle<T>,
    picker: &mut LocationPicker,
    upazila_name: &str,
) -> Result<(), ServiceError>
where
    T: Clone + Send + Sync + 'static,
{
    picker
        .select_upazila(upazila_name)
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    handle
        .set_criterion(UPAZILA_KEY, picker.selection().upazila_name())
        .map_err(|err| ServiceError::Form(err.to_string()))
}
