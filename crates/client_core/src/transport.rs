use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::ActivityCatalog,
    error::ErrorDetail,
    protocol::{
        RosterAction, SignupResponse, UnregisterResponse, ACTIVITIES_PATH, EMAIL_QUERY_PARAM,
    },
};
use tracing::{info, warn};
use url::Url;

use crate::{error::RosterError, settings::ClientSettings};

/// The three roster endpoints the controller depends on.
#[async_trait]
pub trait RosterApi: Send + Sync {
    async fn fetch_activities(&self) -> Result<ActivityCatalog, RosterError>;
    async fn signup(&self, activity: &str, email: &str) -> Result<SignupResponse, RosterError>;
    async fn unregister(
        &self,
        activity: &str,
        email: &str,
    ) -> Result<UnregisterResponse, RosterError>;
}

pub struct HttpRosterApi {
    http: Client,
    base_url: Url,
}

impl HttpRosterApi {
    pub fn new(server_url: &str) -> Result<Self, RosterError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, RosterError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        Self::with_client(builder.build()?, &settings.server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, RosterError> {
        let base_url = Url::parse(server_url.trim())?;
        if base_url.cannot_be_a_base() {
            return Err(RosterError::UnsupportedBaseUrl(server_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn activities_url(&self) -> Result<Url, RosterError> {
        self.url_with_segments(&[ACTIVITIES_PATH])
    }

    /// `/activities/{activity}/{action}?email={email}`, with the activity name
    /// and the email percent-encoded.
    pub fn action_url(
        &self,
        activity: &str,
        action: RosterAction,
        email: &str,
    ) -> Result<Url, RosterError> {
        let mut url =
            self.url_with_segments(&[ACTIVITIES_PATH, activity, action.path_segment()])?;
        url.query_pairs_mut().append_pair(EMAIL_QUERY_PARAM, email);
        Ok(url)
    }

    fn url_with_segments(&self, segments: &[&str]) -> Result<Url, RosterError> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|_| RosterError::UnsupportedBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn post_action(
        &self,
        activity: &str,
        action: RosterAction,
        email: &str,
    ) -> Result<Response, RosterError> {
        let url = self.action_url(activity, action, email)?;
        let response = self.http.post(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(rejection(status, response).await);
        }
        Ok(response)
    }
}

#[async_trait]
impl RosterApi for HttpRosterApi {
    async fn fetch_activities(&self) -> Result<ActivityCatalog, RosterError> {
        let response = self.http.get(self.activities_url()?).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(rejection(status, response).await);
        }
        let catalog: ActivityCatalog = decode_body(response).await?;
        info!(activities = catalog.len(), "roster: catalog fetched");
        Ok(catalog)
    }

    async fn signup(&self, activity: &str, email: &str) -> Result<SignupResponse, RosterError> {
        let response = self
            .post_action(activity, RosterAction::Signup, email)
            .await?;
        decode_body(response).await
    }

    async fn unregister(
        &self,
        activity: &str,
        email: &str,
    ) -> Result<UnregisterResponse, RosterError> {
        let response = self
            .post_action(activity, RosterAction::Unregister, email)
            .await?;
        // Only the status matters; an empty or unexpected body is tolerated.
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes).unwrap_or_default())
    }
}

async fn decode_body<T: DeserializeOwned>(response: Response) -> Result<T, RosterError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

async fn rejection(status: StatusCode, response: Response) -> RosterError {
    let detail = match response.bytes().await {
        Ok(bytes) => serde_json::from_slice::<ErrorDetail>(&bytes)
            .ok()
            .and_then(|body| body.message().map(str::to_owned)),
        Err(err) => {
            warn!(status = status.as_u16(), "roster: unreadable error body: {err}");
            None
        }
    };
    RosterError::Rejected {
        status: status.as_u16(),
        detail,
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
