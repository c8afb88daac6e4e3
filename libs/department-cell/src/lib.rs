pub mod handlers;
pub mod router;
pub mod models;
pub mod services;

pub use models::{Department, DepartmentError, Doctor};
pub use router::department_routes;
pub use services::department::{DepartmentRepository, DepartmentService, StoreDepartmentRepository};
