use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use workforce_core::UserId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn public_routes() -> Router {
    Router::new()
        .route("/api/auth/signin", post(signin))
        .route("/api/auth/signup", post(signup))
}

pub fn protected_routes() -> Router {
    Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/auth/user/:id", get(get_user))
}

pub async fn signin(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::SigninRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match dto::body(payload) {
        Ok(b) => b,
        Err(res) => return res,
    };
    let credentials = match body.into_credentials() {
        Ok(c) => c,
        Err(e) => return errors::auth_error_to_response(e),
    };

    match services.auth.sign_in(credentials, Utc::now()).await {
        Ok(success) => (StatusCode::OK, Json(success)).into_response(),
        Err(e) => {
            tracing::debug!(reason = %e, "sign in failed");
            errors::auth_error_to_response(e)
        }
    }
}

pub async fn signup(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::SignupRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match dto::body(payload) {
        Ok(b) => b,
        Err(res) => return res,
    };
    let registration = match body.into_registration() {
        Ok(r) => r,
        Err(e) => return errors::auth_error_to_response(e),
    };

    match services.auth.sign_up(registration, Utc::now()).await {
        Ok(success) => (StatusCode::CREATED, Json(success)).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn me(Extension(principal): Extension<PrincipalContext>) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(dto::UserResponse {
            user: principal.summary().clone(),
        }),
    )
        .into_response()
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let Ok(id) = id.parse::<UserId>() else {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found");
    };
    if !principal.may_view(id) {
        return errors::forbidden();
    }

    match services.auth.lookup(id).await {
        Ok(user) => (StatusCode::OK, Json(dto::UserResponse { user })).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}
