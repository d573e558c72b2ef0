//! Extractors for the navigation bundle carried in the `state` query token.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use premium_tech_core::{Arrival, Navigation, NavigationBundle, NavigationError, Shopper};
use serde::Deserialize;

use crate::state::AppState;
use crate::token;

#[derive(Debug, Default, Deserialize)]
struct StateQuery {
    state: Option<String>,
}

fn read_bundle(parts: &Parts, state: &AppState) -> NavigationBundle {
    let query = Query::<StateQuery>::try_from_uri(&parts.uri)
        .map(|Query(query)| query)
        .unwrap_or_default();
    state.decode_bundle(query.state.as_deref())
}

/// Extractor for whatever bundle the request carries.
///
/// Never rejects: a missing or unreadable token yields an empty bundle.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(IncomingBundle(bundle): IncomingBundle) -> impl IntoResponse {
///     format!("signed in: {}", bundle.identity.is_some())
/// }
/// ```
#[derive(Debug)]
pub struct IncomingBundle(pub NavigationBundle);

impl FromRequestParts<AppState> for IncomingBundle {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(read_bundle(parts, state)))
    }
}

/// Extractor for protected pages: the bundle must carry an identity.
///
/// Without one the request is redirected to the sign-in page before the
/// handler runs.
#[derive(Debug)]
pub struct RequireShopper(pub Arrival);

/// Redirect issued when a guard fails.
#[derive(Debug)]
pub struct GuardRedirect(NavigationError);

impl IntoResponse for GuardRedirect {
    fn into_response(self) -> Response {
        tracing::debug!(reason = %self.0, "Guard redirect");
        let navigation = Navigation::new(self.0.fallback(), NavigationBundle::empty());
        Redirect::to(&token::location(&navigation)).into_response()
    }
}

impl FromRequestParts<AppState> for RequireShopper {
    type Rejection = GuardRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Shopper::receive(read_bundle(parts, state)).map(Self).map_err(GuardRedirect)
    }
}
