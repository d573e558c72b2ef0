//! The shop page: catalog, cart drawer and wishlist toggles.
//!
//! The shop is the only page that changes the cart directly. Other pages
//! send a pending addition here, which is applied once and then dropped
//! by redirecting to the settled bundle.

use axum::{
    Form, Json,
    extract::State,
    response::{IntoResponse, Response},
};
use premium_tech_core::{Notification, NotificationSink, Route};
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireShopper;
use crate::state::AppState;
use crate::toast::Toasts;
use crate::views::ShopView;

use super::{ProductForm, find_item, redirect, settle};

/// Display the shop.
///
/// A bundle with a pending addition is never rendered: the addition is
/// applied and the shopper redirected to the bundle without it.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireShopper(arrival): RequireShopper,
) -> Response {
    if arrival.pending.is_some() {
        let shopper = settle(arrival);
        return redirect(&shopper.navigate(Route::Shop)).into_response();
    }

    Json(ShopView::new(&arrival.shopper, state.catalog())).into_response()
}

/// Add an item to the cart.
#[instrument(skip_all, fields(product_id = %form.product_id))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    RequireShopper(arrival): RequireShopper,
    Form(form): Form<ProductForm>,
) -> Result<impl IntoResponse> {
    let item = find_item(state.catalog(), form.product_id)?;
    let shopper = settle(arrival).add_to_cart(item);
    let product_id = item.id.to_string();
    add_breadcrumb("cart", "Added item", Some(&[("product_id", product_id.as_str())]));

    let mut toasts = Toasts::new();
    toasts.notify(Notification::added_to_cart(item));
    Ok((toasts, redirect(&shopper.navigate(Route::Shop))))
}

/// Remove an item's whole entry from the cart.
#[instrument(skip_all, fields(product_id = %form.product_id))]
pub async fn remove_from_cart(
    RequireShopper(arrival): RequireShopper,
    Form(form): Form<ProductForm>,
) -> impl IntoResponse {
    let shopper = settle(arrival).remove_from_cart(form.product_id);
    let product_id = form.product_id.to_string();
    add_breadcrumb("cart", "Removed item", Some(&[("product_id", product_id.as_str())]));

    let mut toasts = Toasts::new();
    toasts.notify(Notification::removed_from_cart());
    (toasts, redirect(&shopper.navigate(Route::Shop)))
}

/// Save an item to the wishlist.
#[instrument(skip_all, fields(product_id = %form.product_id))]
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    RequireShopper(arrival): RequireShopper,
    Form(form): Form<ProductForm>,
) -> Result<impl IntoResponse> {
    let item = find_item(state.catalog(), form.product_id)?;
    let shopper = settle(arrival);

    let mut toasts = Toasts::new();
    if !shopper.wishlist().contains(item.id) {
        toasts.notify(Notification::added_to_wishlist(item));
    }
    let shopper = shopper.add_to_wishlist(item);
    Ok((toasts, redirect(&shopper.navigate(Route::Shop))))
}

/// Drop an item from the wishlist.
#[instrument(skip_all, fields(product_id = %form.product_id))]
pub async fn remove_from_wishlist(
    RequireShopper(arrival): RequireShopper,
    Form(form): Form<ProductForm>,
) -> impl IntoResponse {
    let shopper = settle(arrival);

    let mut toasts = Toasts::new();
    if shopper.wishlist().contains(form.product_id) {
        toasts.notify(Notification::removed_from_wishlist());
    }
    let shopper = shopper.remove_from_wishlist(form.product_id);
    (toasts, redirect(&shopper.navigate(Route::Shop)))
}
