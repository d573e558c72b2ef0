//! Sign-in and sign-up.

use axum::{
    Form, Json,
    extract::{Query, State},
    response::IntoResponse,
};
use premium_tech_core::{Navigation, NavigationBundle, NotificationSink, Route};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::services::auth::{self as auth_service, AuthMode, Credentials};
use crate::state::AppState;
use crate::toast::Toasts;
use crate::views::AuthView;

use super::redirect;

/// Query parameters of the auth page.
#[derive(Debug, Default, Deserialize)]
pub struct AuthQuery {
    #[serde(default)]
    pub mode: AuthMode,
}

/// Display the sign-in or sign-up form.
#[instrument(skip_all, fields(mode = ?query.mode))]
pub async fn page(Query(query): Query<AuthQuery>) -> Json<AuthView> {
    Json(AuthView::new(query.mode))
}

/// Submit credentials.
///
/// Waits out the configured delay, then sends the shopper to the shop with
/// an empty cart and wishlist.
#[instrument(skip_all, fields(mode = ?credentials.mode))]
pub async fn submit(
    State(state): State<AppState>,
    Form(credentials): Form<Credentials>,
) -> Result<impl IntoResponse> {
    let identity = auth_service::sign_in(&credentials, state.config().auth_delay).await?;
    tracing::info!(identity = %identity, "Shopper signed in");
    add_breadcrumb("auth", "Signed in", None);

    let mut toasts = Toasts::new();
    toasts.notify(credentials.mode.welcome());

    let navigation = Navigation::new(Route::Shop, NavigationBundle::signed_in(identity));
    Ok((toasts, redirect(&navigation)))
}
