use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;
use tracing::debug;

use shared_database::{Query, StoreError, SupabaseClient};

use crate::models::{Booking, Interval};

pub const BOOKINGS: &str = "bookings";

/// Persistence seam for bookings.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Bookings of `doctor_id` whose interval intersects `range`.
    async fn find_overlapping(
        &self,
        doctor_id: &str,
        range: &Interval,
        auth_token: &str,
    ) -> Result<Vec<Booking>, StoreError>;

    /// Stores `booking` and returns the row as persisted.
    async fn insert(&self, booking: &Booking, auth_token: &str) -> Result<Booking, StoreError>;

    async fn list_all(&self, auth_token: &str) -> Result<Vec<Booking>, StoreError>;
}

pub struct StoreBookingRepository {
    supabase: Arc<SupabaseClient>,
}

impl StoreBookingRepository {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

fn iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[async_trait]
impl BookingRepository for StoreBookingRepository {
    async fn find_overlapping(
        &self,
        doctor_id: &str,
        range: &Interval,
        auth_token: &str,
    ) -> Result<Vec<Booking>, StoreError> {
        let query = Query::collection(BOOKINGS)
            .eq("doctor_id", doctor_id)
            .lt("start_time", iso(range.end))
            .gt("end_time", iso(range.start))
            .order_asc("start_time");

        debug!("Querying bookings of {} between {} and {}", doctor_id, range.start, range.end);
        self.supabase.select(&query, auth_token).await
    }

    async fn insert(&self, booking: &Booking, auth_token: &str) -> Result<Booking, StoreError> {
        let row = json!({
            "id": booking.id,
            "name": booking.name,
            "email": booking.email,
            "phone": booking.phone,
            "dob": booking.dob,
            "department_id": booking.department_id,
            "doctor_id": booking.doctor_id,
            "doctor_name": booking.doctor_name,
            "appointment_type": booking.appointment_type,
            "start_time": iso(booking.start_time),
            "end_time": iso(booking.end_time),
            "created_at": iso(booking.created_at)
        });

        self.supabase.insert(BOOKINGS, row, auth_token).await
    }

    async fn list_all(&self, auth_token: &str) -> Result<Vec<Booking>, StoreError> {
        let query = Query::collection(BOOKINGS).order_asc("start_time");
        self.supabase.select(&query, auth_token).await
    }
}
