pub mod health;
pub mod quote;
pub mod quote_lead;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::state::SharedState;

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/health", get(health::health))
        // Both historical paths for the legacy form are served.
        .route("/quote", post(quote::submit))
        .route("/api/quote", post(quote::submit))
        .route("/api/quote-lead", post(quote_lead::submit))
}

/// Exact-match origin allow-list. Requests without an Origin header
/// (curl, server-to-server) are not subject to CORS at all.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
