use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::{self, TraceLayer};
use tracing::{Level, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use appointment_cell::{AppointmentState, HttpBookingNotifier, SlotSchedulingConfig, StoreBookingRepository};
use auth_cell::{AnonymousAuthService, AuthProvider};
use department_cell::{DepartmentService, StoreDepartmentRepository};
use shared_config::AppConfig;
use shared_database::SupabaseClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting clinic booking API server");

    let config = AppConfig::from_env();

    // Shared collaborators
    let supabase = Arc::new(SupabaseClient::new(&config));
    let auth: Arc<dyn AuthProvider> = Arc::new(AnonymousAuthService::new(Arc::clone(&supabase)));

    let departments = Arc::new(DepartmentService::new(
        Arc::new(StoreDepartmentRepository::new(Arc::clone(&supabase))),
        Arc::clone(&auth),
    ));

    let appointments = Arc::new(AppointmentState::new(
        Arc::new(StoreBookingRepository::new(Arc::clone(&supabase))),
        Arc::clone(&auth),
        Arc::new(HttpBookingNotifier::new(&config)),
        SlotSchedulingConfig::default(),
    ));

    match appointments.feed.reload().await {
        Ok(count) => info!("Loaded {} existing booking(s)", count),
        Err(e) => warn!("Starting with an empty booking feed: {}", e),
    }
    let _status_refresh = appointments
        .feed
        .spawn_status_refresh(Duration::from_secs(config.status_refresh_seconds.max(1)));

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router::create_router(auth, departments, appointments)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new()
                    .level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new()
                    .level(Level::INFO)),
        )
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app)
        .await
        .context("server error")?;

    Ok(())
}
