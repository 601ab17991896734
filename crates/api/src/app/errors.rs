use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use workforce_auth::{AuthError, Rejection, RejectionClass};
use workforce_core::DomainError;
use workforce_employees::RepositoryError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// The single 401 body. Identical for every unauthenticated cause.
pub fn unauthenticated() -> axum::response::Response {
    json_error(
        StatusCode::UNAUTHORIZED,
        "unauthenticated",
        "authentication required",
    )
}

pub fn forbidden() -> axum::response::Response {
    json_error(
        StatusCode::FORBIDDEN,
        "forbidden",
        "you do not have permission to perform this operation",
    )
}

fn unavailable() -> axum::response::Response {
    json_error(
        StatusCode::SERVICE_UNAVAILABLE,
        "store_unavailable",
        "service temporarily unavailable",
    )
}

pub fn rejection_to_response(rejection: Rejection) -> axum::response::Response {
    match rejection.class() {
        RejectionClass::Unauthenticated => unauthenticated(),
        RejectionClass::Forbidden => forbidden(),
        RejectionClass::Unavailable => unavailable(),
    }
}

pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    match err {
        AuthError::MissingFields => json_error(
            StatusCode::BAD_REQUEST,
            "missing_fields",
            "all fields are required",
        ),
        AuthError::InvalidEmail => {
            json_error(StatusCode::BAD_REQUEST, "invalid_email", err.to_string())
        }
        AuthError::WeakPassword => {
            json_error(StatusCode::BAD_REQUEST, "weak_password", err.to_string())
        }
        AuthError::InvalidCredentials => json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            err.to_string(),
        ),
        AuthError::EmailTaken => json_error(StatusCode::CONFLICT, "email_taken", err.to_string()),
        AuthError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "user not found"),
        AuthError::StoreUnavailable => unavailable(),
        AuthError::Internal(msg) => {
            tracing::error!(error = %msg, "internal authentication failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal server error",
            )
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(_) | DomainError::NotFound => {
            json_error(StatusCode::NOT_FOUND, "not_found", "employee not found")
        }
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

pub fn repository_error_to_response(err: RepositoryError) -> axum::response::Response {
    match err {
        RepositoryError::Domain(e) => domain_error_to_response(e),
        RepositoryError::Unavailable(msg) => {
            tracing::warn!(error = %msg, "employee store unavailable");
            unavailable()
        }
    }
}

pub fn invalid_body(message: impl Into<String>) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_body", message)
}
