use std::net::SocketAddr;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

use crate::email::{OutboundEmail, templates};
use crate::error::AppError;
use crate::leads::LeadRecord;
use crate::state::SharedState;
use crate::submission::lead::QuoteLead;
use crate::submission::{honeypot, metadata, parser};

/// Structured quote-lead form. The record is appended to the lead journal
/// before the notification goes out; a failed send is logged, not surfaced,
/// since the lead itself is already on disk.
pub async fn submit(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    if let Err(retry_after) = state.lead_limiter.check(addr.ip()) {
        return Err(AppError::RateLimited { retry_after });
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let raw = parser::parse_body(content_type, &body).map_err(AppError::bad_request)?;

    if honeypot::is_spam(&raw) {
        tracing::info!("Spam detected via honeypot");
        // Throwaway id so the fake success is indistinguishable from a real one
        return Ok(accepted(Uuid::new_v4()));
    }

    let lead = QuoteLead::parse(&raw)?.validate()?;

    let client_ip = metadata::client_ip(&headers, addr.ip(), &state.config.trusted_proxies);
    let record = LeadRecord::new(client_ip.clone(), raw);

    state
        .lead_log
        .append(&record)
        .await
        .map_err(|e| AppError::internal(&state.config, format!("Failed to store lead: {e}")))?;

    let email = OutboundEmail {
        subject: format!("New Quote Lead - {}", lead.service_type),
        html: templates::render_lead_html(&lead, record.received_at, &client_ip),
        text: templates::render_lead_text(&lead, record.received_at, &client_ip),
        reply_to: lead.contact.email.clone().map(|address| {
            let name = lead.contact.name.clone().unwrap_or_else(|| address.clone());
            (name, address)
        }),
        tags: vec![
            "quote-lead".to_string(),
            templates::service_tag(&lead.service_type),
        ],
    };

    if let Err(e) = state.mailer.send(email).await {
        tracing::error!("Lead {} stored but notification failed: {e}", record.id);
    }

    Ok(accepted(record.id))
}

fn accepted(id: Uuid) -> Response {
    (StatusCode::OK, Json(json!({ "ok": true, "id": id }))).into_response()
}
