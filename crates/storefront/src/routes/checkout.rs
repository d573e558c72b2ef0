//! Checkout: order summary, shipping and payment form.
//!
//! Checkout does not insist on a signed-in shopper, only on cart data.
//! Without it the visit ends in a redirect to the shop.

use axum::{
    Form, Json,
    response::{IntoResponse, Response},
};
use premium_tech_core::{CheckoutForm, CheckoutPhase, NotificationSink, Rejected};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::IncomingBundle;
use crate::toast::Toasts;
use crate::views::CheckoutView;

use super::redirect;

/// Display the order summary and form.
#[instrument(skip_all)]
pub async fn show(IncomingBundle(bundle): IncomingBundle) -> Response {
    match CheckoutPhase::enter(bundle) {
        CheckoutPhase::FormEntry(session) => Json(CheckoutView::new(&session)).into_response(),
        CheckoutPhase::NoCartData(navigation) => redirect(&navigation).into_response(),
        CheckoutPhase::Submitted(receipt) => redirect(&receipt.navigation).into_response(),
    }
}

/// Place the order.
///
/// On success the cart is dropped and the shopper returns to the shop. A
/// form that fails validation is answered with 422 and the field errors;
/// the bundle in the URL is unchanged, so the shopper can correct and
/// resubmit.
#[instrument(skip_all)]
pub async fn submit(
    IncomingBundle(bundle): IncomingBundle,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let session = match CheckoutPhase::enter(bundle) {
        CheckoutPhase::FormEntry(session) => session,
        CheckoutPhase::NoCartData(navigation) => return Ok(redirect(&navigation).into_response()),
        CheckoutPhase::Submitted(receipt) => {
            return Ok(redirect(&receipt.navigation).into_response());
        }
    };

    let receipt = session.submit(&form).map_err(|rejected| {
        let Rejected { errors, .. } = *rejected;
        tracing::info!(fields = ?errors.fields().collect::<Vec<_>>(), "Checkout form rejected");
        AppError::Validation(errors)
    })?;

    tracing::info!(
        line_items = receipt.summary.line_items.len(),
        total = %receipt.summary.total,
        "Order placed"
    );
    add_breadcrumb("checkout", "Order placed", None);

    let mut toasts = Toasts::new();
    toasts.notify(receipt.notification);
    Ok((toasts, redirect(&receipt.navigation)).into_response())
}
