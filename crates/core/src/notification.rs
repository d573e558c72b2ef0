//! Shopper-facing notifications ("toasts").
//!
//! Pages raise notifications through a [`NotificationSink`] and never wait
//! on them; how they reach the shopper is up to the sink.

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;

/// A short message shown to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

impl Notification {
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    #[must_use]
    pub fn added_to_cart(item: &CatalogItem) -> Self {
        Self::new(
            "Added to Cart",
            format!("{} has been added to your cart", item.name),
        )
    }

    #[must_use]
    pub fn removed_from_cart() -> Self {
        Self::new("Removed from Cart", "Item has been removed from your cart")
    }

    #[must_use]
    pub fn added_to_wishlist(item: &CatalogItem) -> Self {
        Self::new(
            "Added to Wishlist",
            format!("{} has been added to your wishlist", item.name),
        )
    }

    #[must_use]
    pub fn removed_from_wishlist() -> Self {
        Self::new(
            "Removed from Wishlist",
            "Item has been removed from your wishlist",
        )
    }

    #[must_use]
    pub fn signed_in() -> Self {
        Self::new("Welcome back!", "Redirecting to the shop...")
    }

    #[must_use]
    pub fn account_created() -> Self {
        Self::new("Account created successfully!", "Redirecting to the shop...")
    }

    #[must_use]
    pub fn order_placed() -> Self {
        Self::new(
            "Order Placed Successfully",
            "Thank you for your purchase! You will receive a confirmation email shortly.",
        )
    }
}

/// Fire-and-forget receiver of notifications.
pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

/// Collects notifications in order, e.g. to attach them to a response.
impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}
