//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (nosniff, frame denial, no caching)
//!
//! The bundle extractors are not layers: handlers ask for them by type.

pub mod bundle;
pub mod request_id;
pub mod security_headers;

pub use bundle::{IncomingBundle, RequireShopper};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
