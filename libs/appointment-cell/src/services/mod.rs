pub mod availability;
pub mod booking;
pub mod conflict;
pub mod feed;
pub mod notification;
pub mod repository;
pub mod timeslot;

pub use availability::AvailabilityGate;
pub use booking::BookingSubmitter;
pub use feed::{BookingFeed, FeedEvent, StatusRefreshHandle, Subscription};
pub use notification::{BookingNotifier, HttpBookingNotifier, NotificationError};
pub use repository::{BookingRepository, StoreBookingRepository};
pub use timeslot::TimeSlotCalculator;
