use admin_core::{
    AdminProfile, ApiError, NotificationSettings, ProfileStore, SessionClient, SessionId,
    SessionPatch, SessionRecord, SettingsClient, SettingsGroup, SettingsId, TeamSettings,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;
use url::Url;

use crate::config::ClientConfig;
use crate::dto::ErrorBody;

/// JSON-over-HTTP client for the admin backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        // Relative joins keep any path prefix only when the base ends in '/'.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .with_context(|| format!("Invalid API URL: {}", base_url))?;
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.api_url, config.api_token.clone())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::transport(format!("Failed to build URL for path {path}: {e}")))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let request = self.client.request(method, self.endpoint(path)?);
        Ok(match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    async fn send(&self, request: RequestBuilder, call_name: &str) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::transport(format!("Failed to call {call_name}: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(%status, call = call_name, "request failed");
        Err(match status {
            StatusCode::NOT_FOUND => ApiError::NotFound,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ApiError::Validation(ErrorBody::message_from(&body))
            }
            _ => ApiError::transport(format!("{call_name} returned {status}")),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        call_name: &str,
    ) -> Result<T, ApiError> {
        let response = self.send(request, call_name).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::transport(format!("Failed to parse {call_name} response: {e}")))
    }
}

fn session_path(id: &SessionId) -> String {
    format!("sessions/{}", urlencoding::encode(id.as_str()))
}

#[async_trait]
impl SessionClient for ApiClient {
    #[instrument(name = "get_session", skip(self), fields(session = %id))]
    async fn get_session(&self, id: &SessionId) -> Result<SessionRecord, ApiError> {
        let request = self.request(Method::GET, &session_path(id))?;
        self.get_json(request, "GET /sessions/{id}").await
    }

    #[instrument(name = "update_session", skip(self, patch), fields(session = %id))]
    async fn update_session(
        &self,
        id: &SessionId,
        patch: &SessionPatch,
    ) -> Result<SessionRecord, ApiError> {
        let request = self.request(Method::PATCH, &session_path(id))?.json(patch);
        self.get_json(request, "PATCH /sessions/{id}").await
    }
}

/// Collection path of a settings group on the backend.
pub trait SettingsRoute {
    const PATH: &'static str;
}

impl SettingsRoute for TeamSettings {
    const PATH: &'static str = "team-settings";
}

impl SettingsRoute for NotificationSettings {
    const PATH: &'static str = "notification-settings";
}

#[async_trait]
impl<G> SettingsClient<G> for ApiClient
where
    G: SettingsGroup + SettingsRoute + Serialize + DeserializeOwned,
{
    #[instrument(name = "list_settings", skip(self), fields(path = G::PATH))]
    async fn list_settings(&self) -> Result<Vec<G>, ApiError> {
        let request = self.request(Method::GET, G::PATH)?;
        self.get_json(request, G::PATH).await
    }

    #[instrument(name = "create_settings", skip(self, group), fields(path = G::PATH))]
    async fn create_settings(&self, group: &G) -> Result<G, ApiError> {
        let request = self.request(Method::POST, G::PATH)?.json(group);
        self.get_json(request, G::PATH).await
    }

    #[instrument(name = "update_settings", skip(self, group), fields(path = G::PATH, id = %id))]
    async fn update_settings(&self, id: &SettingsId, group: &G) -> Result<G, ApiError> {
        let path = format!("{}/{}", G::PATH, urlencoding::encode(id.as_str()));
        let request = self.request(Method::PUT, &path)?.json(group);
        self.get_json(request, G::PATH).await
    }
}

#[async_trait]
impl ProfileStore for ApiClient {
    #[instrument(name = "current_profile", skip(self))]
    async fn current_profile(&self) -> Result<AdminProfile, ApiError> {
        let request = self.request(Method::GET, "admin/profile")?;
        self.get_json(request, "GET /admin/profile").await
    }

    #[instrument(name = "update_profile", skip(self, profile))]
    async fn update_profile(&self, profile: &AdminProfile) -> Result<AdminProfile, ApiError> {
        let request = self.request(Method::PUT, "admin/profile")?.json(profile);
        self.get_json(request, "PUT /admin/profile").await
    }
}
