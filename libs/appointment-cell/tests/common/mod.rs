#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use mockall::mock;

use appointment_cell::services::conflict::overlaps;
use appointment_cell::{
    AppointmentState, Booking, BookingDraft, BookingNotification, BookingNotifier,
    BookingRepository, Interval, NotificationError, SlotSchedulingConfig,
};
use auth_cell::{AuthError, AuthProvider};
use shared_database::StoreError;
use shared_models::auth::Session;

pub const DOCTOR: &str = "DR-1700000000000-42";

mock! {
    pub Notifier {}

    #[async_trait]
    impl BookingNotifier for Notifier {
        async fn send(&self, notification: &BookingNotification) -> Result<(), NotificationError>;
    }
}

pub fn quiet_notifier() -> MockNotifier {
    let mut notifier = MockNotifier::new();
    notifier.expect_send().returning(|_| Ok(()));
    notifier
}

#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: Mutex<Vec<Booking>>,
    pub fail_queries: AtomicBool,
    pub fail_inserts: AtomicBool,
    pub reject_credentials: AtomicBool,
    pub reject_insert_credentials: AtomicBool,
    pub queries: AtomicUsize,
}

impl InMemoryBookingRepository {
    pub fn with(bookings: Vec<Booking>) -> Self {
        Self { bookings: Mutex::new(bookings), ..Self::default() }
    }

    pub fn stored(&self) -> Vec<Booking> {
        self.bookings.lock().unwrap().clone()
    }

    fn check(&self, flag: &AtomicBool) -> Result<(), StoreError> {
        if self.reject_credentials.load(Ordering::SeqCst) {
            return Err(StoreError::Unauthorized("JWT expired".to_string()));
        }
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Api { status: 503, message: "store offline".to_string() });
        }
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn find_overlapping(&self, doctor_id: &str, range: &Interval, _auth_token: &str)
        -> Result<Vec<Booking>, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.check(&self.fail_queries)?;
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.doctor_id == doctor_id && overlaps(&b.interval(), range))
            .cloned()
            .collect())
    }

    async fn insert(&self, booking: &Booking, _auth_token: &str) -> Result<Booking, StoreError> {
        if self.reject_insert_credentials.load(Ordering::SeqCst) {
            return Err(StoreError::Unauthorized("row-level security".to_string()));
        }
        self.check(&self.fail_inserts)?;
        self.bookings.lock().unwrap().push(booking.clone());
        Ok(booking.clone())
    }

    async fn list_all(&self, _auth_token: &str) -> Result<Vec<Booking>, StoreError> {
        self.check(&self.fail_queries)?;
        Ok(self.stored())
    }
}

pub struct StaticAuth {
    pub fail: bool,
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn ensure_authenticated(&self) -> Result<Session, AuthError> {
        if self.fail {
            return Err(AuthError::SignInFailed("anonymous sign-in disabled".to_string()));
        }
        Ok(Session {
            user_id: "anon-test".to_string(),
            access_token: "test-session-token".to_string(),
            is_anonymous: true,
            expires_at: Utc::now() + Duration::hours(1),
        })
    }
}

/// Always signs in, counting how often the session was thrown away.
#[derive(Default)]
pub struct CountingAuth {
    pub invalidations: AtomicUsize,
}

#[async_trait]
impl AuthProvider for CountingAuth {
    async fn ensure_authenticated(&self) -> Result<Session, AuthError> {
        StaticAuth { fail: false }.ensure_authenticated().await
    }

    async fn invalidate(&self) {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn state_with_auth(
    repository: Arc<InMemoryBookingRepository>,
    auth: Arc<CountingAuth>,
) -> Arc<AppointmentState> {
    Arc::new(AppointmentState::new(
        repository,
        auth,
        Arc::new(quiet_notifier()),
        SlotSchedulingConfig::default(),
    ))
}

pub fn state_with(
    repository: Arc<InMemoryBookingRepository>,
    notifier: MockNotifier,
) -> Arc<AppointmentState> {
    Arc::new(AppointmentState::new(
        repository,
        Arc::new(StaticAuth { fail: false }),
        Arc::new(notifier),
        SlotSchedulingConfig::default(),
    ))
}

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, hour, minute, 0).unwrap()
}

pub fn booking(id: &str, doctor_id: &str, start: DateTime<Utc>, minutes: i64) -> Booking {
    Booking {
        id: id.to_string(),
        name: "Existing Patient".to_string(),
        email: "existing@example.com".to_string(),
        phone: "+1 555 0100".to_string(),
        dob: None,
        department_id: "cardiology".to_string(),
        doctor_id: doctor_id.to_string(),
        doctor_name: "Dr. John Smith".to_string(),
        appointment_type: "consultation".to_string(),
        start_time: start,
        end_time: start + Duration::minutes(minutes),
        created_at: at(0, 0),
    }
}

pub fn draft(start: DateTime<Utc>, minutes: i64) -> BookingDraft {
    BookingDraft {
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: "+44 20 7946 0000".to_string(),
        dob: Some("1815-12-10".to_string()),
        department_id: "cardiology".to_string(),
        doctor_id: DOCTOR.to_string(),
        doctor_name: "Dr. John Smith".to_string(),
        appointment_type: "consultation".to_string(),
        interval: Some(Interval::new(start, start + Duration::minutes(minutes))),
    }
}
