use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use auth_cell::AuthProvider;
use shared_database::StoreError;

use crate::models::{AppointmentError, Booking, DurationAvailability, Interval, SlotAvailability};
use crate::services::conflict::{conflicts_for, overlaps};
use crate::services::repository::BookingRepository;
use crate::services::timeslot::{add_duration, combine, format_time, TimeSlotCalculator};

/// Answers "is this doctor free for this interval" against the store.
pub struct AvailabilityGate {
    repository: Arc<dyn BookingRepository>,
    auth: Arc<dyn AuthProvider>,
    calculator: TimeSlotCalculator,
}

impl AvailabilityGate {
    pub fn new(
        repository: Arc<dyn BookingRepository>,
        auth: Arc<dyn AuthProvider>,
        calculator: TimeSlotCalculator,
    ) -> Self {
        Self { repository, auth, calculator }
    }

    pub fn calculator(&self) -> &TimeSlotCalculator {
        &self.calculator
    }

    pub async fn is_available(&self, doctor_id: &str, interval: &Interval) -> Result<bool, AppointmentError> {
        let bookings = self.bookings_in(doctor_id, interval).await?;

        // The store filter is trusted only as a prefilter.
        let conflicts = conflicts_for(doctor_id, interval, &bookings);
        if !conflicts.is_empty() {
            info!(
                "Doctor {} has {} conflicting booking(s) between {} and {}",
                doctor_id, conflicts.len(), interval.start, interval.end
            );
        }

        Ok(conflicts.is_empty())
    }

    /// Availability of every candidate start on `date`, from one range query.
    pub async fn day_slots(
        &self,
        doctor_id: &str,
        date: NaiveDate,
        duration: Option<u32>,
    ) -> Result<Vec<SlotAvailability>, AppointmentError> {
        let minutes = self.calculator.duration_or_default(duration)?;
        let starts = self.calculator.candidate_starts(date);

        let (Some(first), Some(last)) = (starts.first(), starts.last()) else {
            return Ok(Vec::new());
        };
        let day = Interval::new(*first, add_duration(*last, minutes));

        let bookings = self.bookings_in(doctor_id, &day).await?;
        let booked: Vec<Interval> = bookings
            .iter()
            .filter(|b| b.doctor_id == doctor_id)
            .map(Booking::interval)
            .collect();

        Ok(starts
            .into_iter()
            .map(|start| {
                let slot = Interval::new(start, add_duration(start, minutes));
                SlotAvailability {
                    time: format_time(start),
                    start_time: slot.start,
                    end_time: slot.end,
                    available: !booked.iter().any(|b| overlaps(b, &slot)),
                }
            })
            .collect())
    }

    /// Which allowed durations are still free when starting at `time_of_day` on `date`.
    pub async fn durations_at(
        &self,
        doctor_id: &str,
        date: NaiveDate,
        time_of_day: &str,
    ) -> Result<Vec<DurationAvailability>, AppointmentError> {
        let start = combine(date, time_of_day)?;
        let durations = &self.calculator.config().allowed_durations;

        let Some(longest) = durations.iter().max() else {
            return Ok(Vec::new());
        };
        let reach = Interval::new(start, add_duration(start, *longest));

        let bookings = self.bookings_in(doctor_id, &reach).await?;
        let booked: Vec<Interval> = bookings
            .iter()
            .filter(|b| b.doctor_id == doctor_id)
            .map(Booking::interval)
            .collect();

        Ok(durations
            .iter()
            .map(|&minutes| {
                let candidate = Interval::new(start, add_duration(start, minutes));
                DurationAvailability {
                    duration: minutes,
                    end_time: candidate.end,
                    available: !booked.iter().any(|b| overlaps(b, &candidate)),
                }
            })
            .collect())
    }

    async fn bookings_in(&self, doctor_id: &str, range: &Interval) -> Result<Vec<Booking>, AppointmentError> {
        let session = self
            .auth
            .ensure_authenticated()
            .await
            .map_err(|e| AppointmentError::AuthenticationRequired(e.to_string()))?;

        debug!("Checking availability of {} for {:?}", doctor_id, range);

        match self.repository.find_overlapping(doctor_id, range, &session.access_token).await {
            Ok(bookings) => Ok(bookings),
            Err(err) => Err(self.map_query_error(err).await),
        }
    }

    async fn map_query_error(&self, err: StoreError) -> AppointmentError {
        warn!("Availability query failed: {}", err);
        if err.is_auth() {
            self.auth.invalidate().await;
            AppointmentError::AuthenticationRequired(err.to_string())
        } else {
            AppointmentError::QueryFailed(err.to_string())
        }
    }
}
