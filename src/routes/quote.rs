use std::net::SocketAddr;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde_json::json;

use crate::email::{OutboundEmail, templates};
use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::quote::QuoteRequest;
use crate::submission::{honeypot, metadata, parser};

/// Legacy quote form. Email delivery is the only durable outcome here, so
/// a failed send fails the whole request.
pub async fn submit(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    if let Err(retry_after) = state.quote_limiter.check(addr.ip()) {
        return Err(AppError::RateLimited { retry_after });
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let raw = parser::parse_body(content_type, &body).map_err(AppError::bad_request)?;

    if honeypot::is_spam(&raw) {
        tracing::info!("Spam detected via honeypot");
        // Fake success to fool bots
        return Ok((StatusCode::OK, Json(json!({ "success": true }))).into_response());
    }

    let quote = QuoteRequest::parse(&raw)?.validate()?;

    let client_ip = metadata::client_ip(&headers, addr.ip(), &state.config.trusted_proxies);
    let submitted_at = Utc::now();

    let email = OutboundEmail {
        subject: format!(
            "New Quote Request from {} - {}",
            quote.full_name, quote.service_type
        ),
        html: templates::render_quote_html(&quote, submitted_at, &client_ip),
        text: templates::render_quote_text(&quote, submitted_at, &client_ip),
        reply_to: Some((quote.full_name.clone(), quote.email.clone())),
        tags: vec![
            "quote-request".to_string(),
            templates::service_tag(&quote.service_type),
        ],
    };

    let message_id = state
        .mailer
        .send(email)
        .await
        .map_err(|e| AppError::email_provider(&state.config, e))?;

    tracing::info!("Quote request sent successfully via Brevo for {}", quote.email);

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Quote request received successfully. We will contact you within 24 hours.",
            "data": {
                "name": quote.full_name,
                "email": quote.email,
                "service": quote.service_type,
                "messageId": message_id,
            }
        })),
    )
        .into_response())
}
