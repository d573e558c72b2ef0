//! Premium Tech Core - the storefront's state model.
//!
//! This crate holds everything about a shopper's visit that is not
//! presentation: the catalog, the cart and wishlist, the bundle of state
//! carried from page to page, and the checkout flow.
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP,
//! no clocks. Collections are never mutated in place; every operation
//! returns a new value, so state already handed to another page is frozen.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails and identities
//! - [`catalog`] - The read-only product and offer list
//! - [`cart`] / [`wishlist`] - Item collections and their operations
//! - [`navigation`] - Routes, bundles and the [`Shopper`] state object
//! - [`checkout`] - Checkout form validation and phases
//! - [`notification`] - Shopper-facing messages

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod navigation;
pub mod notification;
pub mod types;
pub mod wishlist;

pub use cart::{Cart, CartEntry};
pub use catalog::{Catalog, CatalogError, CatalogItem, Offer};
pub use checkout::{
    CheckoutForm, CheckoutPhase, CheckoutReceipt, CheckoutSession, FieldError, FieldProblem,
    FormErrors, OrderSummary, Rejected,
};
pub use navigation::{
    Arrival, CartAddition, Navigation, NavigationBundle, NavigationError, Route, Shopper,
};
pub use notification::{Notification, NotificationSink};
pub use types::*;
pub use wishlist::Wishlist;
