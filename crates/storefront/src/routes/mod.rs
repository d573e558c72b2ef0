//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! Every page reads the shopper's bundle from the `state` query token and
//! every link it returns carries the bundle onward. Actions are POSTs that
//! answer with a 303 redirect to the next page.
//!
//! ```text
//! GET  /                       - Sign-in / sign-up page (?mode=sign_up)
//! POST /                       - Submit credentials
//! GET  /health                 - Health check
//!
//! # Shop
//! GET  /shop                   - Catalog and cart drawer
//! POST /shop/cart/add          - Add to cart
//! POST /shop/cart/remove       - Remove cart entry
//! POST /shop/wishlist/add      - Add to wishlist
//! POST /shop/wishlist/remove   - Remove from wishlist
//!
//! # Offers
//! GET  /offers                 - Special offers
//! POST /offers/cart/add        - Add an offer to cart (via the shop)
//!
//! # Wishlist
//! GET  /wishlist               - Saved items
//! POST /wishlist/cart/add      - Add a saved item to cart (via the shop)
//! POST /wishlist/remove        - Remove a saved item
//!
//! # Checkout
//! GET  /checkout               - Order summary and form
//! POST /checkout               - Place the order
//! ```

pub mod auth;
pub mod checkout;
pub mod offers;
pub mod shop;
pub mod wishlist;

use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use premium_tech_core::{Arrival, Catalog, CatalogItem, Navigation, ProductId, Shopper};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::token;
use crate::views::NotFoundView;

/// Form body of every item action.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub product_id: ProductId,
}

/// Look up a catalog item, or 404.
fn find_item(catalog: &Catalog, id: ProductId) -> Result<&CatalogItem> {
    catalog
        .find(id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Apply any pending addition, consuming it.
///
/// Additions are addressed to the shop. Other pages settle a stray one the
/// same way.
fn settle(arrival: Arrival) -> Shopper {
    let Arrival { shopper, pending } = arrival;
    match pending {
        Some(addition) => {
            tracing::debug!(product_id = %addition.item().id, "Applying pending cart addition");
            shopper.apply(addition)
        }
        None => shopper,
    }
}

/// 303 to a navigation's destination with its bundle attached.
fn redirect(navigation: &Navigation) -> Redirect {
    Redirect::to(&token::location(navigation))
}

/// Create the shop routes router.
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/shop", get(shop::show))
        .route("/shop/cart/add", post(shop::add_to_cart))
        .route("/shop/cart/remove", post(shop::remove_from_cart))
        .route("/shop/wishlist/add", post(shop::add_to_wishlist))
        .route("/shop/wishlist/remove", post(shop::remove_from_wishlist))
}

/// Create the offers routes router.
pub fn offer_routes() -> Router<AppState> {
    Router::new()
        .route("/offers", get(offers::show))
        .route("/offers/cart/add", post(offers::add_to_cart))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/wishlist", get(wishlist::show))
        .route("/wishlist/cart/add", post(wishlist::add_to_cart))
        .route("/wishlist/remove", post(wishlist::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(auth::page).post(auth::submit))
        .route("/health", get(health))
        .merge(shop_routes())
        .merge(offer_routes())
        .merge(wishlist_routes())
        .route("/checkout", get(checkout::show).post(checkout::submit))
        .fallback(not_found)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Catch-all for unknown paths.
async fn not_found(uri: Uri) -> impl IntoResponse {
    tracing::debug!(path = %uri.path(), "No route");
    (StatusCode::NOT_FOUND, Json(NotFoundView::new(uri.path())))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{Request, Response, header::CONTENT_TYPE, header::LOCATION},
    };
    use http_body_util::BodyExt;
    use premium_tech_core::{Identity, NavigationBundle, Route, Shopper};
    use tower::ServiceExt;

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::toast::NOTIFICATION_HEADER;

    fn state() -> AppState {
        let config = StorefrontConfig {
            auth_delay: Duration::ZERO,
            ..StorefrontConfig::default()
        };
        AppState::with_catalog(config, Catalog::builtin())
    }

    fn app() -> Router {
        crate::app(state())
    }

    fn item(id: i32) -> CatalogItem {
        Catalog::builtin().find(ProductId::new(id)).unwrap().clone()
    }

    fn ada() -> Shopper {
        Shopper::new(Identity::new("ada@example.com").unwrap())
    }

    async fn get(uri: &str) -> Response<Body> {
        app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_form(uri: &str, body: &str) -> Response<Body> {
        app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body.to_owned()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn json(response: Response<Body>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn location(response: &Response<Body>) -> String {
        response.headers()[LOCATION].to_str().unwrap().to_owned()
    }

    fn bundle_at(location: &str) -> NavigationBundle {
        let token = location.split_once("?state=").map_or("", |(_, token)| token);
        let token = urlencoding::decode(token).unwrap();
        state().decode_bundle(Some(token.as_ref()))
    }

    #[tokio::test]
    async fn test_health() {
        let response = get("/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_auth_page() {
        let response = get("/?mode=sign_up").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["mode"], "sign_up");
    }

    #[tokio::test]
    async fn test_sign_in_lands_on_empty_shop() {
        let response = post_form("/", "email=ada%40example.com&password=secret").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(response.headers().contains_key(NOTIFICATION_HEADER));

        let to = location(&response);
        assert!(to.starts_with("/shop?state="));
        let bundle = bundle_at(&to);
        assert_eq!(bundle.identity.unwrap().as_str(), "ada@example.com");
        assert!(bundle.cart.unwrap().is_empty());
        assert!(bundle.wishlist.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sign_in_rejects_bad_email() {
        let response = post_form("/", "email=ada&password=secret").await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_protected_pages_redirect_without_identity() {
        for path in ["/shop", "/offers", "/wishlist"] {
            let response = get(path).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
            assert_eq!(location(&response), "/", "{path}");
        }
    }

    #[tokio::test]
    async fn test_garbage_token_redirects_to_sign_in() {
        let response = get("/shop?state=not-a-token").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
    }

    #[tokio::test]
    async fn test_shop_add_to_cart() {
        let action = token::href("/shop/cart/add", &ada().to_bundle());
        let response = post_form(&action, "product_id=1").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let bundle = bundle_at(&location(&response));
        assert_eq!(bundle.cart.unwrap().quantity_of(ProductId::new(1)), 1);
        assert!(bundle.wishlist.is_some());
    }

    #[tokio::test]
    async fn test_shop_unknown_product() {
        let action = token::href("/shop/cart/add", &ada().to_bundle());
        let response = post_form(&action, "product_id=999").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_shop_applies_pending_addition_once() {
        let shopper = ada().add_to_cart(&item(1));
        let navigation = shopper.navigate_with_addition(Route::Shop, &item(101));

        let response = get(&token::location(&navigation)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let consumed = location(&response);
        let bundle = bundle_at(&consumed);
        assert!(bundle.pending_cart_addition.is_none());
        let cart = bundle.cart.unwrap();
        assert_eq!(cart.quantity_of(ProductId::new(1)), 1);
        assert_eq!(cart.quantity_of(ProductId::new(101)), 1);

        // Re-reading the consumed bundle renders without adding again
        let response = get(&consumed).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["cart"]["total_items"], 2);
    }

    #[tokio::test]
    async fn test_offers_add_goes_through_shop() {
        let action = token::href("/offers/cart/add", &ada().to_bundle());
        let response = post_form(&action, "product_id=102").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let bundle = bundle_at(&location(&response));
        assert_eq!(
            bundle.pending_cart_addition.unwrap().item().id,
            ProductId::new(102)
        );
        assert!(bundle.cart.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_offers_rejects_regular_product() {
        let action = token::href("/offers/cart/add", &ada().to_bundle());
        let response = post_form(&action, "product_id=1").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_pending_addition_settled_on_every_page() {
        for route in [Route::Offers, Route::Wishlist] {
            let navigation = ada().navigate_with_addition(route, &item(101));

            let response = get(&token::location(&navigation)).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{route:?}");

            let to = location(&response);
            assert!(to.starts_with(route.path()), "{to}");
            let bundle = bundle_at(&to);
            assert!(bundle.pending_cart_addition.is_none());
            assert_eq!(bundle.cart.unwrap().quantity_of(ProductId::new(101)), 1);
        }
    }

    #[tokio::test]
    async fn test_offer_action_keeps_earlier_addition() {
        let navigation = ada().navigate_with_addition(Route::Offers, &item(101));
        let action = token::href("/offers/cart/add", &navigation.bundle);
        let response = post_form(&action, "product_id=102").await;

        let bundle = bundle_at(&location(&response));
        assert_eq!(bundle.cart.unwrap().quantity_of(ProductId::new(101)), 1);
        assert_eq!(
            bundle.pending_cart_addition.unwrap().item().id,
            ProductId::new(102)
        );
    }

    #[tokio::test]
    async fn test_wishlist_toasts_only_on_change() {
        let shopper = ada().add_to_wishlist(&item(3));
        let bundle = shopper.to_bundle();

        let cases = [
            ("/shop/wishlist/add", "product_id=3", false),
            ("/shop/wishlist/add", "product_id=4", true),
            ("/shop/wishlist/remove", "product_id=5", false),
            ("/shop/wishlist/remove", "product_id=3", true),
            ("/wishlist/remove", "product_id=5", false),
            ("/wishlist/remove", "product_id=3", true),
        ];
        for (path, form, notified) in cases {
            let response = post_form(&token::href(path, &bundle), form).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path} {form}");
            assert_eq!(
                response.headers().contains_key(NOTIFICATION_HEADER),
                notified,
                "{path} {form}"
            );
        }
    }

    #[tokio::test]
    async fn test_wishlist_remove() {
        let shopper = ada().add_to_wishlist(&item(3)).add_to_wishlist(&item(4));
        let action = token::href("/wishlist/remove", &shopper.to_bundle());
        let response = post_form(&action, "product_id=3").await;

        let to = location(&response);
        assert!(to.starts_with("/wishlist?state="));
        let wishlist = bundle_at(&to).wishlist.unwrap();
        assert_eq!(wishlist.len(), 1);
        assert!(wishlist.contains(ProductId::new(4)));
    }

    #[tokio::test]
    async fn test_checkout_without_cart_redirects_to_shop() {
        let response = get("/checkout").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/shop");
    }

    #[tokio::test]
    async fn test_checkout_shows_total() {
        let shopper = ada().add_to_cart(&item(1));
        let response = get(&token::location(&shopper.navigate(Route::Checkout))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json(response).await;
        assert_eq!(body["summary"]["total"], "$299.99");
        assert_eq!(body["summary"]["lines"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_checkout_invalid_form() {
        let shopper = ada().add_to_cart(&item(1));
        let action = token::location(&shopper.navigate(Route::Checkout));
        let response = post_form(&action, "name=Ada&cvv=12345").await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = json(response).await;
        let fields: Vec<&str> = body["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|error| error["field"].as_str().unwrap())
            .collect();
        assert!(!fields.contains(&"name"));
        assert!(fields.contains(&"cvv"));
    }

    #[tokio::test]
    async fn test_checkout_submit_keeps_only_identity() {
        let shopper = ada().add_to_cart(&item(1)).add_to_wishlist(&item(5));
        let action = token::location(&shopper.navigate(Route::Checkout));
        let form = "name=Ada+Lovelace&email=ada%40example.com&address=12+Analytical+Way\
                    &city=London&zip_code=N1&card_number=4242424242424242\
                    &expiry_date=12%2F30&cvv=123";
        let response = post_form(&action, form).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(response.headers().contains_key(NOTIFICATION_HEADER));

        let bundle = bundle_at(&location(&response));
        assert_eq!(bundle.identity.unwrap().as_str(), "ada@example.com");
        assert!(bundle.cart.is_none());
        assert!(bundle.wishlist.is_none());
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let response = get("/nowhere").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json(response).await;
        assert_eq!(body["path"], "/nowhere");
    }

    #[tokio::test]
    async fn test_security_headers_on_every_response() {
        let response = get("/nowhere").await;
        assert_eq!(response.headers()["cache-control"], "no-store");
        assert!(response.headers().contains_key("x-request-id"));
    }
}
