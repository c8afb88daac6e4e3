use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use crate::handlers;
use crate::services::department::DepartmentService;

pub fn department_routes(state: Arc<DepartmentService>) -> Router {
    Router::new()
        .route("/", get(handlers::list_departments))
        .route("/{department_id}/doctors", get(handlers::get_department_doctors))
        .with_state(state)
}
