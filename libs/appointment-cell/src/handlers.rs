use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::{AppointmentError, BookingRequest};
use crate::router::AppointmentState;

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::ValidationError(_) | AppointmentError::InvalidTimeFormat(_) => {
                AppError::ValidationError(err.to_string())
            }
            AppointmentError::AuthenticationRequired(_) => AppError::Auth(err.to_string()),
            AppointmentError::QueryFailed(_) | AppointmentError::PersistenceFailed(_) => {
                AppError::ServiceUnavailable(err.to_string())
            }
            AppointmentError::SlotUnavailable => AppError::Conflict(err.to_string()),
            AppointmentError::NotificationFailed(_) => AppError::Internal(err.to_string()),
        }
    }
}

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub doctor_id: String,
    pub date: NaiveDate,
    pub time: String,
    pub duration: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DaySlotsQuery {
    pub date: NaiveDate,
    pub duration: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DurationsQuery {
    pub date: NaiveDate,
    pub time: String,
}

// ==============================================================================
// AVAILABILITY HANDLERS
// ==============================================================================

pub async fn check_availability(
    State(state): State<Arc<AppointmentState>>,
    Query(params): Query<AvailabilityQuery>,
) -> Result<Json<Value>, AppError> {
    let interval = state.calculator.resolve(params.date, &params.time, params.duration)?;
    let available = state.gate.is_available(&params.doctor_id, &interval).await?;

    Ok(Json(json!({
        "doctor_id": params.doctor_id,
        "start_time": interval.start,
        "end_time": interval.end,
        "available": available
    })))
}

pub async fn get_day_slots(
    State(state): State<Arc<AppointmentState>>,
    Path(doctor_id): Path<String>,
    Query(params): Query<DaySlotsQuery>,
) -> Result<Json<Value>, AppError> {
    let duration = state.calculator.duration_or_default(params.duration)?;
    let slots = state.gate.day_slots(&doctor_id, params.date, Some(duration)).await?;
    let available = slots.iter().filter(|slot| slot.available).count();

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "date": params.date,
        "duration": duration,
        "slots": slots,
        "available_count": available
    })))
}

pub async fn get_durations(
    State(state): State<Arc<AppointmentState>>,
    Path(doctor_id): Path<String>,
    Query(params): Query<DurationsQuery>,
) -> Result<Json<Value>, AppError> {
    let durations = state.gate.durations_at(&doctor_id, params.date, &params.time).await?;

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "date": params.date,
        "time": params.time,
        "durations": durations
    })))
}

// ==============================================================================
// BOOKING HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<AppointmentState>>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let draft = request.into_draft(&state.calculator)?;
    let outcome = state.submitter.submit(draft).await?;

    Ok((StatusCode::CREATED, Json(json!({
        "success": true,
        "booking": outcome.booking,
        "warning": outcome.warning.map(|w| w.to_string())
    }))))
}

pub async fn list_bookings(
    State(state): State<Arc<AppointmentState>>,
) -> Result<Json<Value>, AppError> {
    state.feed.reload().await?;
    let bookings = state.feed.snapshot(Utc::now());

    Ok(Json(json!({
        "appointments": bookings,
        "total": bookings.len()
    })))
}

pub async fn list_today_bookings(
    State(state): State<Arc<AppointmentState>>,
) -> Result<Json<Value>, AppError> {
    state.feed.reload().await?;
    let bookings = state.feed.today(Utc::now());

    Ok(Json(json!({
        "appointments": bookings,
        "total": bookings.len()
    })))
}

pub async fn list_upcoming_bookings(
    State(state): State<Arc<AppointmentState>>,
) -> Result<Json<Value>, AppError> {
    state.feed.reload().await?;
    let bookings = state.feed.upcoming(Utc::now());

    Ok(Json(json!({
        "appointments": bookings,
        "total": bookings.len()
    })))
}
