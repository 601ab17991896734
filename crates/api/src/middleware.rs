use axum::{
    extract::State,
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use workforce_auth::{AccessGate, AccessRequirement, bearer_token};

use crate::app::errors;
use crate::context::PrincipalContext;

/// Gate configuration for one group of routes.
#[derive(Clone)]
pub struct GateState {
    pub gate: AccessGate,
    pub requirement: AccessRequirement,
}

impl GateState {
    pub fn new(gate: AccessGate, requirement: AccessRequirement) -> Self {
        Self { gate, requirement }
    }
}

pub async fn gate_middleware(
    State(state): State<GateState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = extract_bearer(req.headers());

    match state
        .gate
        .admit(token.as_deref(), state.requirement, Utc::now())
        .await
    {
        Ok(principal) => {
            req.extensions_mut().insert(PrincipalContext::new(principal));
            next.run(req).await
        }
        Err(rejection) => {
            tracing::debug!(
                reason = %rejection,
                path = %req.uri().path(),
                "request rejected by access gate"
            );
            errors::rejection_to_response(rejection)
        }
    }
}

/// A non-UTF-8 header is treated like a missing one.
fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok();
    bearer_token(header).map(str::to_owned)
}
