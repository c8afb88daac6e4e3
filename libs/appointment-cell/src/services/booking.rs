use std::sync::{Arc, OnceLock};

use chrono::Utc;
use regex::Regex;
use tracing::{debug, error, info, warn};

use auth_cell::AuthProvider;
use shared_utils::ids::{generate_id, BOOKING_ID_PREFIX};

use crate::models::{
    AppointmentError, Booking, BookingDraft, BookingNotification, BookingRequest, Interval,
    SubmissionOutcome,
};
use crate::services::availability::AvailabilityGate;
use crate::services::feed::BookingFeed;
use crate::services::notification::BookingNotifier;
use crate::services::repository::BookingRepository;
use crate::services::timeslot::TimeSlotCalculator;

const UNKNOWN_DOCTOR: &str = "Unknown Doctor";
const UNKNOWN_DEPARTMENT: &str = "Unknown Department";

/// `local@domain.tld`, no whitespace.
fn looks_like_email(email: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(email))
}

impl BookingRequest {
    /// Turns the posted form into a draft, resolving its time selection.
    pub fn into_draft(self, calculator: &TimeSlotCalculator) -> Result<BookingDraft, AppointmentError> {
        let interval = match (self.date, self.time.as_deref(), self.start_time, self.end_time) {
            (Some(date), Some(time), None, None) => Some(calculator.resolve(date, time, self.duration)?),
            (None, None, Some(start), Some(end)) => Some(Interval::new(start, end)),
            (None, None, None, None) => None,
            (Some(_), Some(_), _, _) => {
                return Err(AppointmentError::ValidationError(
                    "Give either date and time or start_time and end_time, not both".to_string(),
                ));
            }
            (Some(_), None, _, _) | (None, Some(_), _, _) => {
                return Err(AppointmentError::ValidationError(
                    "date and time must be given together".to_string(),
                ));
            }
            (None, None, _, _) => {
                return Err(AppointmentError::ValidationError(
                    "start_time and end_time must be given together".to_string(),
                ));
            }
        };

        Ok(BookingDraft {
            name: self.name,
            email: self.email,
            phone: self.phone,
            dob: self.dob.filter(|d| !d.trim().is_empty()),
            department_id: self.department_id,
            doctor_id: self.doctor_id,
            doctor_name: self.doctor_name,
            appointment_type: self.appointment_type,
            interval,
        })
    }
}

/// Re-checks availability, persists, publishes and notifies.
pub struct BookingSubmitter {
    gate: Arc<AvailabilityGate>,
    repository: Arc<dyn BookingRepository>,
    auth: Arc<dyn AuthProvider>,
    notifier: Arc<dyn BookingNotifier>,
    feed: Arc<BookingFeed>,
}

impl BookingSubmitter {
    pub fn new(
        gate: Arc<AvailabilityGate>,
        repository: Arc<dyn BookingRepository>,
        auth: Arc<dyn AuthProvider>,
        notifier: Arc<dyn BookingNotifier>,
        feed: Arc<BookingFeed>,
    ) -> Self {
        Self { gate, repository, auth, notifier, feed }
    }

    pub async fn submit(&self, draft: BookingDraft) -> Result<SubmissionOutcome, AppointmentError> {
        let interval = validate_draft(&draft)?;

        debug!("Submitting booking for doctor {} at {}", draft.doctor_id, interval.start);

        if !self.gate.is_available(&draft.doctor_id, &interval).await? {
            warn!("Slot {} - {} for doctor {} is taken", interval.start, interval.end, draft.doctor_id);
            return Err(AppointmentError::SlotUnavailable);
        }

        let session = self
            .auth
            .ensure_authenticated()
            .await
            .map_err(|e| AppointmentError::AuthenticationRequired(e.to_string()))?;

        let booking = Booking {
            id: generate_id(BOOKING_ID_PREFIX),
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            phone: draft.phone.trim().to_string(),
            dob: draft.dob,
            department_id: or_default(draft.department_id, UNKNOWN_DEPARTMENT),
            doctor_id: draft.doctor_id.trim().to_string(),
            doctor_name: or_default(draft.doctor_name, UNKNOWN_DOCTOR),
            appointment_type: draft.appointment_type.trim().to_string(),
            start_time: interval.start,
            end_time: interval.end,
            created_at: Utc::now(),
        };

        let stored = match self.repository.insert(&booking, &session.access_token).await {
            Ok(stored) => stored,
            Err(e) if e.is_auth() => {
                error!("Store rejected the session while saving {}: {}", booking.id, e);
                self.auth.invalidate().await;
                return Err(AppointmentError::AuthenticationRequired(e.to_string()));
            }
            Err(e) => {
                error!("Failed to persist booking {}: {}", booking.id, e);
                return Err(AppointmentError::PersistenceFailed(e.to_string()));
            }
        };

        info!("Booking {} saved for doctor {}", stored.id, stored.doctor_id);
        self.feed.publish(stored.clone());

        let warning = match self.notifier.send(&BookingNotification::from(&stored)).await {
            Ok(()) => None,
            Err(e) => {
                warn!("Booking {} saved but confirmation failed: {}", stored.id, e);
                Some(AppointmentError::NotificationFailed(e.to_string()))
            }
        };

        Ok(SubmissionOutcome { booking: stored, warning })
    }
}

fn validate_draft(draft: &BookingDraft) -> Result<Interval, AppointmentError> {
    let required = [
        ("name", &draft.name),
        ("email", &draft.email),
        ("phone", &draft.phone),
        ("doctor_id", &draft.doctor_id),
        ("appointment_type", &draft.appointment_type),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(AppointmentError::ValidationError(format!("{} is required", field)));
    }

    if !looks_like_email(draft.email.trim()) {
        return Err(AppointmentError::ValidationError(format!("Invalid email address: {}", draft.email)));
    }

    let interval = draft
        .interval
        .ok_or_else(|| AppointmentError::ValidationError("Appointment time is required".to_string()))?;

    if !interval.is_well_formed() {
        return Err(AppointmentError::ValidationError(
            "Appointment end time must be after its start time".to_string(),
        ));
    }

    Ok(interval)
}

fn or_default(value: String, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
