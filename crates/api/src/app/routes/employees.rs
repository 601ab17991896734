use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};

use workforce_core::{DomainError, EmployeeId};
use workforce_employees::{EmployeeUpdate, NewEmployee};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

/// Read endpoints: any authenticated caller.
pub fn reader_routes() -> Router {
    Router::new()
        .route("/api/employees", get(list_employees))
        .route("/api/employees/search", get(search_employees))
        .route("/api/employees/:id", get(get_employee))
}

/// Write endpoints: admins only.
pub fn admin_routes() -> Router {
    Router::new()
        .route("/api/employees", post(create_employee))
        .route("/api/employees/:id", put(update_employee).delete(delete_employee))
}

fn parse_id(raw: &str) -> Result<EmployeeId, axum::response::Response> {
    raw.parse::<EmployeeId>()
        .map_err(errors::domain_error_to_response)
}

pub async fn list_employees(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.employees.list().await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn search_employees(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::SearchParams>,
) -> axum::response::Response {
    let query = params.query.unwrap_or_default();
    match services.employees.search(&query).await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn get_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match services.employees.get(id).await {
        Ok(employee) => (StatusCode::OK, Json(employee)).into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn create_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    payload: Result<Json<dto::CreateEmployeeRequest>, JsonRejection>,
) -> axum::response::Response {
    let new = match dto::body(payload).and_then(|draft| {
        NewEmployee::from_draft(draft).map_err(errors::domain_error_to_response)
    }) {
        Ok(n) => n,
        Err(res) => return res,
    };

    match services.employees.create(new).await {
        Ok(employee) => {
            tracing::info!(employee_id = %employee.id, by = %principal.user_id(), "employee created");
            (StatusCode::CREATED, Json(employee)).into_response()
        }
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn update_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    payload: Result<Json<dto::UpdateEmployeeRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    let update = match dto::body(payload).and_then(|draft| {
        EmployeeUpdate::from_draft(draft).map_err(errors::domain_error_to_response)
    }) {
        Ok(u) => u,
        Err(res) => return res,
    };
    if update.is_empty() {
        return errors::domain_error_to_response(DomainError::validation("no fields to update"));
    }

    match services.employees.update(id, update).await {
        Ok(employee) => {
            tracing::info!(employee_id = %employee.id, by = %principal.user_id(), "employee updated");
            (StatusCode::OK, Json(employee)).into_response()
        }
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn delete_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };

    match services.employees.delete(id).await {
        Ok(()) => {
            tracing::info!(employee_id = %id, by = %principal.user_id(), "employee deleted");
            (
                StatusCode::OK,
                Json(dto::MessageResponse {
                    message: "Employee deleted successfully",
                }),
            )
                .into_response()
        }
        Err(e) => errors::repository_error_to_response(e),
    }
}
