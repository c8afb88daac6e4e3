use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::DepartmentError;
use crate::services::department::DepartmentService;

impl From<DepartmentError> for AppError {
    fn from(err: DepartmentError) -> Self {
        match err {
            DepartmentError::AuthenticationRequired(_) => AppError::Auth(err.to_string()),
            DepartmentError::QueryFailed(_) => AppError::ServiceUnavailable(err.to_string()),
        }
    }
}

pub async fn list_departments(
    State(service): State<Arc<DepartmentService>>,
) -> Result<Json<Value>, AppError> {
    let departments = service.list_departments().await?;

    Ok(Json(json!({
        "departments": departments,
        "total": departments.len()
    })))
}

pub async fn get_department_doctors(
    State(service): State<Arc<DepartmentService>>,
    Path(department_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doctors = service.get_doctors_by_department(&department_id).await?;

    Ok(Json(json!({
        "department_id": department_id,
        "doctors": doctors,
        "total": doctors.len()
    })))
}
