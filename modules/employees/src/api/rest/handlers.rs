use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::Utc;
use once_cell::sync::Lazy;
use tracing::{error, info};
use uuid::Uuid;

use crate::api::rest::dto::{
    CreateEmployeeReq, DeleteResponseDto, EmployeeDto, EmployeePageDto, HealthDto,
    ListEmployeesQuery, UpdateEmployeeReq,
};
use crate::api::rest::error::{map_domain_error, ApiError};
use crate::contract::EmployeeQuery;
use crate::domain::service::Service;

/// Process start marker for the health probe's uptime field.
pub(crate) static STARTED: Lazy<Instant> = Lazy::new(Instant::now);

/// Environment name echoed by the health probe, injected at router build.
#[derive(Clone)]
pub struct RuntimeEnv(pub Arc<String>);

/// Range checks for `page`/`limit` happen here; the domain service
/// assumes they already hold.
fn validate_query(q: ListEmployeesQuery) -> Result<EmployeeQuery, ApiError> {
    let page = q.page.unwrap_or(1);
    let limit = q.limit.unwrap_or(10);

    if page < 1 {
        return Err(ApiError::bad_request("page must be at least 1"));
    }
    if !(1..=100).contains(&limit) {
        return Err(ApiError::bad_request("limit must be between 1 and 100"));
    }

    Ok(EmployeeQuery {
        page,
        limit,
        search: q.search,
        department: q.department,
        location: q.location,
    })
}

pub async fn list_employees(
    Extension(svc): Extension<Arc<Service>>,
    Query(query): Query<ListEmployeesQuery>,
) -> Result<Json<EmployeePageDto>, ApiError> {
    info!("Listing employees with query: {:?}", query);

    let query = validate_query(query)?;
    match svc.list_employees(query).await {
        Ok(page) => Ok(Json(EmployeePageDto::from(page))),
        Err(e) => {
            error!("Failed to list employees: {}", e);
            Err(map_domain_error(&e))
        }
    }
}

/// Get a specific employee by ID
pub async fn get_employee(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
) -> Result<Json<EmployeeDto>, ApiError> {
    info!("Getting employee with id: {}", id);

    match svc.get_employee(id).await {
        Ok(employee) => Ok(Json(EmployeeDto::from(employee))),
        Err(e) => {
            error!("Failed to get employee {}: {}", id, e);
            Err(map_domain_error(&e))
        }
    }
}

/// Create a new employee
pub async fn create_employee(
    Extension(svc): Extension<Arc<Service>>,
    Json(req_body): Json<CreateEmployeeReq>,
) -> Result<(StatusCode, Json<EmployeeDto>), ApiError> {
    info!("Creating employee with email: {}", req_body.email);

    match svc.create_employee(req_body.into()).await {
        Ok(employee) => Ok((StatusCode::CREATED, Json(EmployeeDto::from(employee)))),
        Err(e) => {
            error!("Failed to create employee: {}", e);
            Err(map_domain_error(&e))
        }
    }
}

/// Update an existing employee
pub async fn update_employee(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    Json(req_body): Json<UpdateEmployeeReq>,
) -> Result<Json<EmployeeDto>, ApiError> {
    info!("Updating employee {}", id);

    match svc.update_employee(id, req_body.into()).await {
        Ok(employee) => Ok(Json(EmployeeDto::from(employee))),
        Err(e) => {
            error!("Failed to update employee {}: {}", id, e);
            Err(map_domain_error(&e))
        }
    }
}

/// Delete an employee by ID
pub async fn delete_employee(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponseDto>, ApiError> {
    info!("Deleting employee: {}", id);

    match svc.delete_employee(id).await {
        Ok(()) => Ok(Json(DeleteResponseDto {
            message: "Employee deleted successfully".to_string(),
        })),
        Err(e) => {
            error!("Failed to delete employee {}: {}", id, e);
            Err(map_domain_error(&e))
        }
    }
}

/// Store connectivity probe.
///
/// A failing store downgrades to a `warning` payload with diagnostic
/// detail instead of failing the whole probe.
pub async fn health(
    Extension(svc): Extension<Arc<Service>>,
    Extension(env): Extension<RuntimeEnv>,
) -> impl IntoResponse {
    let uptime_secs = STARTED.elapsed().as_secs();
    let timestamp = Utc::now();
    let environment = env.0.as_ref().clone();

    match svc.probe_store().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthDto {
                status: "ok".to_string(),
                timestamp,
                uptime_secs,
                environment,
                database: "connected".to_string(),
                database_error: None,
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthDto {
                status: "warning".to_string(),
                timestamp,
                uptime_secs,
                environment,
                database: "disconnected".to_string(),
                database_error: Some(e.to_string()),
            }),
        ),
    }
}
