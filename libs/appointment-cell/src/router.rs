use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use auth_cell::AuthProvider;

use crate::handlers;
use crate::models::SlotSchedulingConfig;
use crate::services::{
    AvailabilityGate, BookingFeed, BookingNotifier, BookingRepository, BookingSubmitter,
    TimeSlotCalculator,
};

/// Shared components behind the appointment endpoints.
pub struct AppointmentState {
    pub calculator: TimeSlotCalculator,
    pub gate: Arc<AvailabilityGate>,
    pub submitter: Arc<BookingSubmitter>,
    pub feed: Arc<BookingFeed>,
}

impl AppointmentState {
    pub fn new(
        repository: Arc<dyn BookingRepository>,
        auth: Arc<dyn AuthProvider>,
        notifier: Arc<dyn BookingNotifier>,
        config: SlotSchedulingConfig,
    ) -> Self {
        let calculator = TimeSlotCalculator::new(config);
        let gate = Arc::new(AvailabilityGate::new(
            Arc::clone(&repository),
            Arc::clone(&auth),
            calculator.clone(),
        ));
        let feed = Arc::new(BookingFeed::new(Arc::clone(&repository), Arc::clone(&auth)));
        let submitter = Arc::new(BookingSubmitter::new(
            Arc::clone(&gate),
            repository,
            auth,
            notifier,
            Arc::clone(&feed),
        ));

        Self { calculator, gate, submitter, feed }
    }
}

pub fn appointment_routes(state: Arc<AppointmentState>) -> Router {
    Router::new()
        .route("/", get(handlers::list_bookings).post(handlers::create_booking))
        .route("/today", get(handlers::list_today_bookings))
        .route("/upcoming", get(handlers::list_upcoming_bookings))
        .route("/availability", get(handlers::check_availability))
        .route("/doctors/{doctor_id}/slots", get(handlers::get_day_slots))
        .route("/doctors/{doctor_id}/durations", get(handlers::get_durations))
        .with_state(state)
}
