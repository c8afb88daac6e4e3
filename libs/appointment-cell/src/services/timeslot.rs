use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};

use crate::models::{AppointmentError, Interval, SlotSchedulingConfig};

/// Date plus "HH:MM", read as UTC wall-clock with zero seconds.
pub fn combine(date: NaiveDate, time_of_day: &str) -> Result<DateTime<Utc>, AppointmentError> {
    let invalid = || AppointmentError::InvalidTimeFormat(time_of_day.to_string());

    let mut parts = time_of_day.trim().split(':');
    let (hours, minutes) = match (parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(m), None) => (parse_component(h).ok_or_else(invalid)?, parse_component(m).ok_or_else(invalid)?),
        _ => return Err(invalid()),
    };

    let time = NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(invalid)?;
    Ok(date.and_time(time).and_utc())
}

fn parse_component(raw: &str) -> Option<u32> {
    if raw.is_empty() || raw.len() > 2 || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

pub fn add_duration(start: DateTime<Utc>, minutes: u32) -> DateTime<Utc> {
    start + Duration::minutes(i64::from(minutes))
}

pub fn format_time(timestamp: DateTime<Utc>) -> String {
    format!("{:02}:{:02}", timestamp.hour(), timestamp.minute())
}

/// Slot grid arithmetic for one clinic day.
#[derive(Debug, Clone, Default)]
pub struct TimeSlotCalculator {
    config: SlotSchedulingConfig,
}

impl TimeSlotCalculator {
    pub fn new(config: SlotSchedulingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SlotSchedulingConfig {
        &self.config
    }

    /// Every step from day start to day end, both inclusive.
    pub fn candidate_starts(&self, date: NaiveDate) -> Vec<DateTime<Utc>> {
        let first = date.and_time(self.config.day_start).and_utc();
        let last = date.and_time(self.config.day_end).and_utc();
        let step = Duration::minutes(i64::from(self.config.slot_step_minutes.max(1)));

        let mut starts = Vec::new();
        let mut current = first;
        while current <= last {
            starts.push(current);
            current += step;
        }
        starts
    }

    pub fn duration_or_default(&self, duration: Option<u32>) -> Result<u32, AppointmentError> {
        let minutes = duration.unwrap_or(self.config.default_duration);
        if !self.config.is_allowed_duration(minutes) {
            return Err(AppointmentError::ValidationError(format!(
                "Duration must be one of {:?} minutes, got {}",
                self.config.allowed_durations, minutes
            )));
        }
        Ok(minutes)
    }

    pub fn resolve(
        &self,
        date: NaiveDate,
        time_of_day: &str,
        duration: Option<u32>,
    ) -> Result<Interval, AppointmentError> {
        let minutes = self.duration_or_default(duration)?;
        let start = combine(date, time_of_day)?;
        Ok(Interval::new(start, add_duration(start, minutes)))
    }
}
