use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};

use shared_config::AppConfig;

use crate::models::BookingNotification;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Notification endpoint is not configured")]
    NotConfigured,

    #[error("Notification endpoint rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Notification request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Delivers booking confirmations.
#[async_trait]
pub trait BookingNotifier: Send + Sync {
    async fn send(&self, notification: &BookingNotification) -> Result<(), NotificationError>;
}

/// Posts confirmations to `{BOOKING_API_URL}/send-booking-email`.
pub struct HttpBookingNotifier {
    client: Client,
    base_url: String,
}

impl HttpBookingNotifier {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.booking_api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BookingNotifier for HttpBookingNotifier {
    async fn send(&self, notification: &BookingNotification) -> Result<(), NotificationError> {
        if self.base_url.is_empty() {
            return Err(NotificationError::NotConfigured);
        }

        let url = format!("{}/send-booking-email", self.base_url);
        debug!("Sending confirmation for {} to {}", notification.booking_id, url);

        let response = self.client.post(&url).json(notification).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected { status: status.as_u16(), body });
        }

        info!("Confirmation sent for booking {}", notification.booking_id);
        Ok(())
    }
}
