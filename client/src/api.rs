//! Transport seam between the session client and the auth endpoints.
//!
//! [`AuthApi`] abstracts the four server calls the session lifecycle needs,
//! so tests can substitute a fake transport; [`HttpAuthApi`] is the real
//! implementation over `reqwest`.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Principal summary as returned by the auth and profile endpoints.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub role_id: String,
    pub status: String,
    pub created_by: Option<String>,
}

/// The access/refresh token pair held by a session.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Successful login/signup response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: Principal,
    pub access_token: String,
    pub refresh_token: String,
}

/// Standard error body returned by every failing endpoint. Only the
/// human-readable message is carried forward.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Errors surfaced by the transport layer.
#[derive(Debug, Error)]
pub enum ApiClientError {
    /// Bad email or bad password; the server keeps the two indistinguishable.
    #[error("Email or password incorrect")]
    InvalidCredentials,

    /// The account exists but has been deactivated.
    #[error("Account is inactive")]
    InactiveAccount,

    /// Any other non-success response from the server.
    #[error("Request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),
}

/// The server calls the session lifecycle depends on.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiClientError>;
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ApiClientError>;
    async fn fetch_profile(&self, access_token: &str) -> Result<Principal, ApiClientError>;
    async fn logout(&self) -> Result<(), ApiClientError>;
}

/// `reqwest`-backed [`AuthApi`] implementation.
pub struct HttpAuthApi {
    base_url: String,
    http: reqwest::Client,
}

impl HttpAuthApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turns a non-success response into an [`ApiClientError::Api`],
    /// preserving the server's message when the body parses.
    async fn api_error(response: reqwest::Response) -> ApiClientError {
        let status = response.status().as_u16();
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => "Unexpected server response".to_string(),
        };

        ApiClientError::Api { status, message }
    }
}

impl From<reqwest::Error> for ApiClientError {
    fn from(error: reqwest::Error) -> Self {
        ApiClientError::Network(error.to_string())
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiClientError> {
        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            // Only the login endpoint maps the two credential failures onto
            // dedicated variants; callers show different messages for them.
            return Err(match Self::api_error(response).await {
                ApiClientError::Api { status: 401, .. } => ApiClientError::InvalidCredentials,
                ApiClientError::Api { status: 403, .. } => ApiClientError::InactiveAccount,
                other => other,
            });
        }

        Ok(response.json::<LoginResponse>().await?)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ApiClientError> {
        let response = self
            .http
            .post(self.url("/api/auth/refresh"))
            .json(&serde_json::json!({ "refreshToken": refresh_token }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        Ok(response.json::<TokenPair>().await?)
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<Principal, ApiClientError> {
        let response = self
            .http
            .get(self.url("/api/users/profile"))
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        Ok(response.json::<Principal>().await?)
    }

    async fn logout(&self) -> Result<(), ApiClientError> {
        let response = self.http.post(self.url("/api/auth/logout")).send().await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        Ok(())
    }
}
