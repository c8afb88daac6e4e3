use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==============================================================================
// TIME MODELS
// ==============================================================================

/// Half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn is_well_formed(&self) -> bool {
        self.start < self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Clinic-day slot grid and the durations patients may pick.
#[derive(Debug, Clone)]
pub struct SlotSchedulingConfig {
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    pub slot_step_minutes: u32,
    pub allowed_durations: Vec<u32>,
    pub default_duration: u32,
}

impl Default for SlotSchedulingConfig {
    fn default() -> Self {
        Self {
            day_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            day_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN),
            slot_step_minutes: 15,
            allowed_durations: vec![15, 30, 45, 60],
            default_duration: 30,
        }
    }
}

impl SlotSchedulingConfig {
    pub fn is_allowed_duration(&self, minutes: u32) -> bool {
        self.allowed_durations.contains(&minutes)
    }
}

// ==============================================================================
// BOOKING MODELS
// ==============================================================================

/// A persisted booking. Created once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub dob: Option<String>,
    pub department_id: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub appointment_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn interval(&self) -> Interval {
        Interval::new(self.start_time, self.end_time)
    }
}

/// Everything a booking needs before it gets an id and creation time.
#[derive(Debug, Clone, Default)]
pub struct BookingDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub dob: Option<String>,
    pub department_id: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub appointment_type: String,
    pub interval: Option<Interval>,
}

/// Booking form as posted by the browser.
///
/// The time is given either as `date` + `time` ("HH:MM") + optional `duration`
/// in minutes, or as an explicit `start_time`/`end_time` pair.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub department_id: String,
    #[serde(default)]
    pub doctor_id: String,
    #[serde(default)]
    pub doctor_name: String,
    #[serde(default)]
    pub appointment_type: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SlotAvailability {
    pub time: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub available: bool,
}

/// Whether one allowed duration still fits at a chosen start.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DurationAvailability {
    pub duration: u32,
    pub end_time: DateTime<Utc>,
    pub available: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    Scheduled,
    InProgress,
    Completed,
}

impl DisplayStatus {
    pub fn at(interval: &Interval, now: DateTime<Utc>) -> Self {
        if now > interval.end {
            DisplayStatus::Completed
        } else if now >= interval.start {
            DisplayStatus::InProgress
        } else {
            DisplayStatus::Scheduled
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingView {
    #[serde(flatten)]
    pub booking: Booking,
    pub status: DisplayStatus,
}

impl BookingView {
    pub fn at(booking: Booking, now: DateTime<Utc>) -> Self {
        let status = DisplayStatus::at(&booking.interval(), now);
        Self { booking, status }
    }
}

/// Result of a successful submission. The warning never undoes the booking.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub booking: Booking,
    pub warning: Option<AppointmentError>,
}

/// Body of the confirmation e-mail request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingNotification {
    pub patient_name: String,
    pub email: String,
    pub phone: String,
    pub department_name: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub appointment_type: String,
    pub appointment_date: String,
    pub start_time: String,
    pub end_time: String,
    pub booking_id: String,
}

impl From<&Booking> for BookingNotification {
    fn from(booking: &Booking) -> Self {
        Self {
            patient_name: booking.name.clone(),
            email: booking.email.clone(),
            phone: booking.phone.clone(),
            department_name: booking.department_id.clone(),
            doctor_id: booking.doctor_id.clone(),
            doctor_name: booking.doctor_name.clone(),
            appointment_type: booking.appointment_type.clone(),
            appointment_date: booking.start_time.format("%Y-%m-%d").to_string(),
            start_time: booking.start_time.to_rfc3339_opts(SecondsFormat::Millis, true),
            end_time: booking.end_time.to_rfc3339_opts(SecondsFormat::Millis, true),
            booking_id: booking.id.clone(),
        }
    }
}

// ==============================================================================
// ERROR MODELS
// ==============================================================================

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppointmentError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),

    #[error("Authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("Availability query failed: {0}")]
    QueryFailed(String),

    #[error("The selected time slot is no longer available")]
    SlotUnavailable,

    #[error("Failed to save booking: {0}")]
    PersistenceFailed(String),

    #[error("Confirmation notification failed: {0}")]
    NotificationFailed(String),
}
