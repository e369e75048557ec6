pub mod config;
pub mod email;
pub mod error;
pub mod leads;
pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod submission;
pub mod validate;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::email::Mailer;
use crate::error::AppError;
use crate::leads::LeadLog;
use crate::rate_limit::FixedWindowLimiter;
use crate::state::{AppState, SharedState};

/// Assemble the service. The mailer and lead log are passed in rather than
/// constructed here so tests can substitute their own.
pub fn build_app(config: Config, mailer: Arc<dyn Mailer>, lead_log: LeadLog) -> Router {
    let cors = routes::cors_layer(&config.allowed_origins);
    let max_body_size = config.max_body_size;
    let window = Duration::from_secs(config.rate_window_secs);

    let state: SharedState = Arc::new(AppState {
        quote_limiter: FixedWindowLimiter::new(config.quote_rate_limit, window),
        lead_limiter: FixedWindowLimiter::new(config.lead_rate_limit, window),
        config,
        mailer,
        lead_log,
    });

    tokio::spawn(prune_limiters(state.clone()));

    Router::new()
        .merge(routes::routes())
        .fallback(not_found)
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("Endpoint not found".to_string())
}

/// Drop expired rate-limit windows so idle IPs don't accumulate forever.
async fn prune_limiters(state: SharedState) {
    let mut interval = tokio::time::interval(Duration::from_secs(15 * 60));
    loop {
        interval.tick().await;
        state.quote_limiter.cleanup();
        state.lead_limiter.cleanup();
    }
}
