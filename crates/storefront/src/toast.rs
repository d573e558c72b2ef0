//! Delivery of shopper notifications.
//!
//! Handlers collect notifications in [`Toasts`] while they work. Each one is
//! logged when raised and attached to the response as an `x-notification`
//! header holding the notification as JSON.

use std::convert::Infallible;

use axum::{
    http::HeaderValue,
    response::{IntoResponseParts, ResponseParts},
};
use premium_tech_core::{Notification, NotificationSink};

/// Response header carrying one notification.
pub const NOTIFICATION_HEADER: &str = "x-notification";

/// Notifications raised while handling one request.
#[derive(Debug, Default)]
pub struct Toasts(Vec<Notification>);

impl Toasts {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Notification] {
        &self.0
    }
}

impl NotificationSink for Toasts {
    fn notify(&mut self, notification: Notification) {
        tracing::info!(
            title = %notification.title,
            description = %notification.description,
            "Notification"
        );
        self.0.push(notification);
    }
}

impl IntoResponseParts for Toasts {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        for notification in self.0 {
            let value = serde_json::to_vec(&notification)
                .ok()
                .and_then(|json| HeaderValue::from_bytes(&json).ok());
            match value {
                Some(value) => {
                    res.headers_mut().append(NOTIFICATION_HEADER, value);
                }
                None => tracing::warn!(
                    title = %notification.title,
                    "Notification could not be encoded as a header"
                ),
            }
        }
        Ok(res)
    }
}
