use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::{appointment_routes, AppointmentState};
use auth_cell::{auth_routes, AuthProvider};
use department_cell::{department_routes, DepartmentService};

pub fn create_router(
    auth: Arc<dyn AuthProvider>,
    departments: Arc<DepartmentService>,
    appointments: Arc<AppointmentState>,
) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic booking API is running!" }))
        .nest("/auth", auth_routes(auth))
        .nest("/departments", department_routes(departments))
        .nest("/appointments", appointment_routes(appointments))
}
