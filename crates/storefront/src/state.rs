//! Application state shared across handlers.
//!
//! Only read-only things live here. Shopper state never does: it travels
//! with each request in the bundle token.

use std::sync::Arc;

use premium_tech_core::{Catalog, CatalogError, NavigationBundle};

use crate::config::StorefrontConfig;
use crate::token;

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to read catalog file {path}: {source}")]
    CatalogFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
}

impl AppState {
    /// Create the application state, loading the catalog named in the
    /// configuration or falling back to the built-in one.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog file cannot be read or is invalid.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let catalog = match &config.catalog_path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| {
                    StateError::CatalogFile {
                        path: path.display().to_string(),
                        source,
                    }
                })?;
                Catalog::from_json(&json)?
            }
            None => Catalog::builtin(),
        };
        Ok(Self::with_catalog(config, catalog))
    }

    /// Create the application state around an already loaded catalog.
    #[must_use]
    pub fn with_catalog(config: StorefrontConfig, catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, catalog }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Decode a request's bundle token against the catalog.
    ///
    /// A missing token is an empty bundle. So is an unreadable one, after a
    /// warning: the page guards then redirect somewhere safe.
    #[must_use]
    pub fn decode_bundle(&self, token: Option<&str>) -> NavigationBundle {
        let Some(token) = token.filter(|token| !token.is_empty()) else {
            return NavigationBundle::empty();
        };
        token::decode(token, self.catalog()).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Discarding unreadable state token");
            NavigationBundle::empty()
        })
    }
}
