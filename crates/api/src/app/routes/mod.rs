use std::sync::Arc;

use axum::{Router, middleware::from_fn_with_state, routing::get};

use workforce_auth::{AccessRequirement, Role};

use crate::app::services::AppServices;
use crate::middleware::{GateState, gate_middleware};

pub mod auth;
pub mod employees;
pub mod system;

/// Router for every endpoint.
///
/// Routes are grouped by what the gate demands of the caller. Groups that
/// share a path (e.g. `GET` vs `PUT /api/employees/:id`) are merged, so each
/// method keeps its own requirement.
pub fn router(services: &Arc<AppServices>) -> Router {
    let authenticated = GateState::new(services.gate.clone(), AccessRequirement::Authenticated);
    let admin = GateState::new(services.gate.clone(), AccessRequirement::Role(Role::Admin));

    let public = Router::new()
        .route("/health", get(system::health))
        .merge(auth::public_routes());

    let signed_in = Router::new()
        .merge(auth::protected_routes())
        .merge(employees::reader_routes())
        .route_layer(from_fn_with_state(authenticated, gate_middleware));

    let admin_only = employees::admin_routes()
        .route_layer(from_fn_with_state(admin, gate_middleware));

    public.merge(signed_in).merge(admin_only)
}
