//! REST backend adapter built on `reqwest`.

use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::domain::donation_request::{DonationRequest, NewDonationRequest, RequestStatus};
use crate::domain::location::{District, Upazila};
use crate::domain::page::PageResult;
use crate::domain::session::{AuthToken, Session};
use crate::domain::types::RecordId;
use crate::domain::user::{ProfileUpdate, Role, User, UserStatus};
use crate::dto::lists::ListQuery;
use crate::dto::wire::{
    DistrictWire, DonationRequestWire, Normalize, UpazilaWire, UserWire, WirePage, normalize_all,
};
use crate::models::config::ClientConfig;
use crate::source::errors::{SourceError, SourceResult};
use crate::source::{ListSource, ReferenceSource, RequestWriter, UserWriter};

/// Shared HTTP client bound to one backend and one session token.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<AuthToken>,
}

impl ApiClient {
    /// Builds a client for `config`, authenticating with the session's token if any.
    pub fn new(config: &ClientConfig, session: &Session) -> SourceResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: session.token().cloned(),
        })
    }

    /// Same client, authenticating with `token` instead.
    pub fn with_token(mut self, token: AuthToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Typed list source for `path`, decoding items as `W`.
    pub fn list<W>(&self, path: &str) -> HttpList<W> {
        HttpList {
            api: self.clone(),
            path: path.to_string(),
            _wire: PhantomData,
        }
    }

    /// Profile behind the current token.
    pub async fn fetch_current_user(&self) -> SourceResult<User> {
        self.send_record::<UserWire>(self.request(Method::GET, "users/me"))
            .await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        }
    }

    async fn send<R: DeserializeOwned>(&self, builder: RequestBuilder) -> SourceResult<R> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            log::error!("Backend answered {status}: {message}");
            return Err(SourceError::from_status(status.as_u16(), message));
        }
        Ok(response.json::<R>().await?)
    }

    async fn send_empty(&self, builder: RequestBuilder) -> SourceResult<()> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            log::error!("Backend answered {status}: {message}");
            return Err(SourceError::from_status(status.as_u16(), message));
        }
        Ok(())
    }

    async fn send_record<W>(&self, builder: RequestBuilder) -> SourceResult<W::Output>
    where
        W: Normalize + DeserializeOwned,
    {
        let wire: W = self.send(builder).await?;
        Ok(wire.normalize()?)
    }
}

/// List endpoint of the backend, normalizing `W` items into domain records.
pub struct HttpList<W> {
    api: ApiClient,
    path: String,
    _wire: PhantomData<fn() -> W>,
}

#[async_trait]
impl<W> ListSource<W::Output> for HttpList<W>
where
    W: Normalize + DeserializeOwned + Send + 'static,
    W::Output: Send + 'static,
{
    async fn fetch_page(&self, query: &ListQuery) -> SourceResult<PageResult<W::Output>> {
        log::debug!("GET {} {:?}", self.path, query.to_params());
        let builder = self
            .api
            .request(Method::GET, &self.path)
            .query(&query.to_params());
        let page: WirePage<W> = self.api.send(builder).await?;
        Ok(page.into_page(query.page, query.limit))
    }
}

#[async_trait]
impl ReferenceSource for ApiClient {
    async fn fetch_districts(&self) -> SourceResult<Vec<District>> {
        let wire: Vec<DistrictWire> = self.send(self.request(Method::GET, "districts")).await?;
        Ok(normalize_all(wire))
    }

    async fn fetch_upazilas(&self) -> SourceResult<Vec<Upazila>> {
        let wire: Vec<UpazilaWire> = self.send(self.request(Method::GET, "upazilas")).await?;
        Ok(normalize_all(wire))
    }
}

#[async_trait]
impl RequestWriter for ApiClient {
    async fn create_request(&self, request: &NewDonationRequest) -> SourceResult<DonationRequest> {
        let builder = self
            .request(Method::POST, "donation-requests")
            .json(request);
        self.send_record::<DonationRequestWire>(builder).await
    }

    async fn update_request_status(
        &self,
        id: &RecordId,
        status: RequestStatus,
    ) -> SourceResult<DonationRequest> {
        let builder = self
            .request(Method::PATCH, &format!("donation-requests/{id}/status"))
            .json(&json!({ "status": status }));
        self.send_record::<DonationRequestWire>(builder).await
    }

    async fn delete_request(&self, id: &RecordId) -> SourceResult<()> {
        self.send_empty(self.request(Method::DELETE, &format!("donation-requests/{id}")))
            .await
    }
}

#[async_trait]
impl UserWriter for ApiClient {
    async fn update_profile(&self, update: &ProfileUpdate) -> SourceResult<User> {
        let builder = self.request(Method::PATCH, "users/me").json(update);
        self.send_record::<UserWire>(builder).await
    }

    async fn update_user_status(&self, id: &RecordId, status: UserStatus) -> SourceResult<User> {
        let builder = self
            .request(Method::PATCH, &format!("users/{id}/status"))
            .json(&json!({ "status": status }));
        self.send_record::<UserWire>(builder).await
    }

    async fn update_user_role(&self, id: &RecordId, role: Role) -> SourceResult<User> {
        let builder = self
            .request(Method::PATCH, &format!("users/{id}/role"))
            .json(&json!({ "role": role }));
        self.send_record::<UserWire>(builder).await
    }
}
