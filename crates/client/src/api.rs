//! HTTP access to the authentication endpoints.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use workforce_auth::{AuthSuccess, IdentitySummary};
use workforce_core::UserId;

use crate::session::SessionError;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with an error body.
    #[error("{status} {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The server operations the session bootstrap depends on.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSuccess, ClientError>;

    async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSuccess, ClientError>;

    /// Fetch identity `id`, presenting `token` as the bearer credential.
    async fn lookup(&self, id: UserId, token: &str) -> Result<IdentitySummary, ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct UserBody {
    user: IdentitySummary,
}

impl HttpAuthApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        res: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = res.status();
        if status.is_success() {
            return res
                .json::<T>()
                .await
                .map_err(|e| ClientError::Decode(e.to_string()));
        }

        let text = res
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let body: ErrorBody = serde_json::from_str(&text).unwrap_or(ErrorBody {
            error: "unknown".to_string(),
            message: text,
        });
        Err(ClientError::Api {
            status: status.as_u16(),
            code: body.error,
            message: body.message,
        })
    }
}

fn transport(e: reqwest::Error) -> ClientError {
    ClientError::Transport(e.to_string())
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSuccess, ClientError> {
        let res = self
            .http
            .post(self.url("/api/auth/signin"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(transport)?;
        Self::decode(res).await
    }

    async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSuccess, ClientError> {
        let res = self
            .http
            .post(self.url("/api/auth/signup"))
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await
            .map_err(transport)?;
        Self::decode(res).await
    }

    async fn lookup(&self, id: UserId, token: &str) -> Result<IdentitySummary, ClientError> {
        let res = self
            .http
            .get(self.url(&format!("/api/auth/user/{id}")))
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport)?;
        Self::decode::<UserBody>(res).await.map(|b| b.user)
    }
}
