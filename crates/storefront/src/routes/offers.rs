//! Special offers.

use axum::{
    Form, Json,
    extract::State,
    response::{IntoResponse, Response},
};
use premium_tech_core::{Notification, NotificationSink, Route};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequireShopper;
use crate::state::AppState;
use crate::toast::Toasts;
use crate::views::OffersView;

use super::{ProductForm, redirect, settle};

/// Display the offers.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireShopper(arrival): RequireShopper,
) -> Response {
    if arrival.pending.is_some() {
        let shopper = settle(arrival);
        return redirect(&shopper.navigate(Route::Offers)).into_response();
    }

    Json(OffersView::new(&arrival.shopper, state.catalog())).into_response()
}

/// Add an offer to the cart.
///
/// The cart lives on the shop page, so the offer travels there as a pending
/// addition.
#[instrument(skip_all, fields(product_id = %form.product_id))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    RequireShopper(arrival): RequireShopper,
    Form(form): Form<ProductForm>,
) -> Result<impl IntoResponse> {
    let offer = state
        .catalog()
        .find_offer(form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("offer {}", form.product_id)))?;

    let mut toasts = Toasts::new();
    toasts.notify(Notification::added_to_cart(&offer.item));

    let navigation = settle(arrival).navigate_with_addition(Route::Shop, &offer.item);
    Ok((toasts, redirect(&navigation)))
}
