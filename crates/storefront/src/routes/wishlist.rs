//! The wishlist page.

use axum::{
    Form, Json,
    response::{IntoResponse, Response},
};
use premium_tech_core::{Notification, NotificationSink, Route};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequireShopper;
use crate::toast::Toasts;
use crate::views::WishlistView;

use super::{ProductForm, redirect, settle};

/// Display the saved items.
#[instrument(skip_all)]
pub async fn show(RequireShopper(arrival): RequireShopper) -> Response {
    if arrival.pending.is_some() {
        let shopper = settle(arrival);
        return redirect(&shopper.navigate(Route::Wishlist)).into_response();
    }

    Json(WishlistView::new(&arrival.shopper)).into_response()
}

/// Add a saved item to the cart, by way of the shop.
///
/// The item stays in the wishlist.
#[instrument(skip_all, fields(product_id = %form.product_id))]
pub async fn add_to_cart(
    RequireShopper(arrival): RequireShopper,
    Form(form): Form<ProductForm>,
) -> Result<impl IntoResponse> {
    let shopper = settle(arrival);
    let item = shopper
        .wishlist()
        .get(form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("wishlist item {}", form.product_id)))?;

    let mut toasts = Toasts::new();
    toasts.notify(Notification::added_to_cart(item));

    let navigation = shopper.navigate_with_addition(Route::Shop, item);
    Ok((toasts, redirect(&navigation)))
}

/// Remove an item from the wishlist.
#[instrument(skip_all, fields(product_id = %form.product_id))]
pub async fn remove(
    RequireShopper(arrival): RequireShopper,
    Form(form): Form<ProductForm>,
) -> impl IntoResponse {
    let shopper = settle(arrival);

    let mut toasts = Toasts::new();
    if shopper.wishlist().contains(form.product_id) {
        toasts.notify(Notification::removed_from_wishlist());
    }
    let shopper = shopper.remove_from_wishlist(form.product_id);
    (toasts, redirect(&shopper.navigate(Route::Wishlist)))
}
