use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use crate::handlers;
use crate::services::session::AuthProvider;

pub fn auth_routes(state: Arc<dyn AuthProvider>) -> Router {
    Router::new()
        .route("/session", get(handlers::get_session))
        .with_state(state)
}
