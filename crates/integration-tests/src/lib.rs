//! End-to-end tests for the Premium Tech storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p premium-tech-integration-tests
//! ```
//!
//! Each test spawns its own storefront on an ephemeral port with the sign-in
//! delay switched off, and drives it over real HTTP. Redirects are not
//! followed automatically so that every hop of a navigation can be checked.

use std::time::Duration;

use premium_tech_core::{Catalog, NavigationBundle};
use premium_tech_storefront::config::StorefrontConfig;
use premium_tech_storefront::state::AppState;
use premium_tech_storefront::toast::NOTIFICATION_HEADER;
use premium_tech_storefront::{app, token};
use reqwest::{Client, Response, StatusCode, header::LOCATION, redirect::Policy};
use serde_json::Value;
use tokio::net::TcpListener;

/// A storefront running in the background of a test.
pub struct TestServer {
    base_url: String,
    client: Client,
    catalog: Catalog,
}

impl TestServer {
    /// Start a storefront serving the built-in catalog.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn spawn() -> Self {
        let config = StorefrontConfig {
            port: 0,
            auth_delay: Duration::ZERO,
            ..StorefrontConfig::default()
        };
        let catalog = Catalog::builtin();
        let state = AppState::with_catalog(config, catalog.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        tokio::spawn(async move {
            axum::serve(listener, app(state))
                .await
                .expect("Test server error");
        });

        let client = Client::builder()
            .redirect(Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: format!("http://{addr}"),
            client,
            catalog,
        }
    }

    /// Absolute URL for a path (which may carry a query).
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a path.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed")
    }

    /// POST a form to a path.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST failed")
    }

    /// GET a page and return its JSON view.
    ///
    /// # Panics
    ///
    /// Panics unless the page answers 200 with JSON.
    pub async fn view(&self, path: &str) -> Value {
        let response = self.get(path).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {path}");
        response.json().await.expect("View is not JSON")
    }

    /// Sign in and return the shop URL the storefront redirects to.
    ///
    /// # Panics
    ///
    /// Panics unless sign-in redirects.
    pub async fn sign_in(&self, email: &str) -> String {
        let response = self
            .post_form("/", &[("email", email), ("password", "correct horse")])
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        location(&response)
    }

    /// Decode the bundle carried by a location.
    #[must_use]
    pub fn bundle_at(&self, location: &str) -> NavigationBundle {
        let Some((_, encoded)) = location.split_once("?state=") else {
            return NavigationBundle::empty();
        };
        let raw = urlencoding::decode(encoded).expect("State token is not UTF-8");
        token::decode(&raw, &self.catalog).expect("Location carries an invalid token")
    }
}

/// The `Location` of a redirect.
///
/// # Panics
///
/// Panics if the response has no valid `Location` header.
#[must_use]
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("Response is not a redirect")
        .to_owned()
}

/// Notifications attached to a response.
///
/// # Panics
///
/// Panics if a notification header is not JSON.
#[must_use]
pub fn notifications(response: &Response) -> Vec<Value> {
    response
        .headers()
        .get_all(NOTIFICATION_HEADER)
        .iter()
        .map(|value| serde_json::from_slice(value.as_bytes()).expect("Notification is not JSON"))
        .collect()
}
