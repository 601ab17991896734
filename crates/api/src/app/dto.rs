use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use workforce_auth::{AuthError, Credentials, IdentitySummary, Registration};
use workforce_employees::EmployeeDraft;

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Deserialize)]
pub struct SigninRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl SigninRequest {
    pub fn into_credentials(self) -> Result<Credentials, AuthError> {
        Credentials::parse(self.email.as_deref(), self.password.as_deref())
    }
}

impl core::fmt::Debug for SigninRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SigninRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Any `role` field a client submits is ignored.
#[derive(Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl SignupRequest {
    pub fn into_registration(self) -> Result<Registration, AuthError> {
        Registration::parse(
            self.name.as_deref(),
            self.email.as_deref(),
            self.password.as_deref(),
        )
    }
}

impl core::fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SignupRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub type CreateEmployeeRequest = EmployeeDraft;
pub type UpdateEmployeeRequest = EmployeeDraft;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: IdentitySummary,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Unwrap a JSON body, mapping malformed payloads to the API's error shape.
pub fn body<T>(
    payload: Result<axum::Json<T>, JsonRejection>,
) -> Result<T, axum::response::Response> {
    payload
        .map(|axum::Json(v)| v)
        .map_err(|e| errors::invalid_body(e.body_text()))
}
