use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use auth_cell::AuthProvider;

use crate::models::{AppointmentError, Booking, BookingView};
use crate::services::repository::BookingRepository;

const FEED_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Created(Booking),
    Reloaded { count: usize },
    StatusesRefreshed { at: DateTime<Utc> },
}

/// Live view over persisted bookings.
pub struct BookingFeed {
    repository: Arc<dyn BookingRepository>,
    auth: Arc<dyn AuthProvider>,
    bookings: RwLock<Vec<Booking>>,
    sender: broadcast::Sender<FeedEvent>,
}

impl BookingFeed {
    pub fn new(repository: Arc<dyn BookingRepository>, auth: Arc<dyn AuthProvider>) -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            repository,
            auth,
            bookings: RwLock::new(Vec::new()),
            sender,
        }
    }

    /// Replaces the snapshot with everything in the store.
    pub async fn reload(&self) -> Result<usize, AppointmentError> {
        let session = self
            .auth
            .ensure_authenticated()
            .await
            .map_err(|e| AppointmentError::AuthenticationRequired(e.to_string()))?;

        let mut loaded = match self.repository.list_all(&session.access_token).await {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!("Failed to reload bookings: {}", e);
                if e.is_auth() {
                    self.auth.invalidate().await;
                    return Err(AppointmentError::AuthenticationRequired(e.to_string()));
                }
                return Err(AppointmentError::QueryFailed(e.to_string()));
            }
        };
        loaded.sort_by_key(|b| b.start_time);

        let count = loaded.len();
        match self.bookings.write() {
            Ok(mut guard) => *guard = loaded,
            Err(poisoned) => *poisoned.into_inner() = loaded,
        }

        debug!("Booking feed reloaded with {} booking(s)", count);
        self.emit(FeedEvent::Reloaded { count });
        Ok(count)
    }

    pub fn publish(&self, booking: Booking) {
        {
            let mut guard = match self.bookings.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let position = guard.partition_point(|b| b.start_time <= booking.start_time);
            guard.insert(position, booking.clone());
        }
        self.emit(FeedEvent::Created(booking));
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription { receiver: self.sender.subscribe() }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> Vec<BookingView> {
        self.views(now, |_| true)
    }

    /// Bookings starting on today's date.
    pub fn today(&self, now: DateTime<Utc>) -> Vec<BookingView> {
        let today = now.date_naive();
        self.views(now, |b| b.start_time.date_naive() == today)
    }

    /// Bookings starting at or after today's midnight.
    pub fn upcoming(&self, now: DateTime<Utc>) -> Vec<BookingView> {
        let midnight = now.date_naive().and_hms_opt(0, 0, 0).map(|t| t.and_utc()).unwrap_or(now);
        self.views(now, |b| b.start_time >= midnight)
    }

    /// Emits `StatusesRefreshed` every `period` until the handle is dropped.
    pub fn spawn_status_refresh(self: &Arc<Self>, period: Duration) -> StatusRefreshHandle {
        let feed = Arc::clone(self);
        info!("Refreshing booking statuses every {:?}", period);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                feed.emit(FeedEvent::StatusesRefreshed { at: Utc::now() });
            }
        });

        StatusRefreshHandle { task }
    }

    fn views(&self, now: DateTime<Utc>, keep: impl Fn(&Booking) -> bool) -> Vec<BookingView> {
        let guard = match self.bookings.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard
            .iter()
            .filter(|b| keep(b))
            .cloned()
            .map(|b| BookingView::at(b, now))
            .collect()
    }

    fn emit(&self, event: FeedEvent) {
        // No receivers is not an error for a feed.
        let _ = self.sender.send(event);
    }
}

/// One listener on a [`BookingFeed`]. Dropping it unsubscribes.
pub struct Subscription {
    receiver: broadcast::Receiver<FeedEvent>,
}

impl Subscription {
    /// Next event, or `None` once the feed is gone.
    pub async fn recv(&mut self) -> Option<FeedEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Feed subscriber lagged, skipped {} event(s)", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    pub fn unsubscribe(self) {}
}

pub struct StatusRefreshHandle {
    task: JoinHandle<()>,
}

impl StatusRefreshHandle {
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for StatusRefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
