use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::config::Config;

pub const RATE_LIMIT_MESSAGE: &str =
    "Too many quote requests from this IP, please try again later.";
const QUOTE_FAILURE_MESSAGE: &str =
    "Failed to process quote request. Please try again or call us directly.";

#[derive(Debug)]
pub enum AppError {
    BadRequest {
        message: String,
        required: Option<&'static [&'static str]>,
    },
    RateLimited {
        retry_after: u64,
    },
    NotFound(String),
    /// Brevo returned non-2xx or the request itself failed.
    EmailProvider {
        detail: String,
        expose: bool,
    },
    Internal {
        detail: String,
        expose: bool,
    },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
            required: None,
        }
    }

    pub fn missing_fields(required: &'static [&'static str]) -> Self {
        AppError::BadRequest {
            message: "Missing required fields".to_string(),
            required: Some(required),
        }
    }

    pub fn email_provider(config: &Config, detail: impl std::fmt::Display) -> Self {
        AppError::EmailProvider {
            detail: detail.to_string(),
            expose: !config.is_production(),
        }
    }

    pub fn internal(config: &Config, detail: impl std::fmt::Display) -> Self {
        AppError::Internal {
            detail: detail.to_string(),
            expose: !config.is_production(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::BadRequest { message, .. } => write!(f, "Bad Request: {message}"),
            AppError::RateLimited { retry_after } => {
                write!(f, "Rate Limited: retry after {retry_after}s")
            }
            AppError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            AppError::EmailProvider { detail, .. } => write!(f, "Email Provider Error: {detail}"),
            AppError::Internal { detail, .. } => write!(f, "Internal Error: {detail}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest { message, required } => {
                let body = match required {
                    Some(fields) => json!({ "error": message, "required": fields }),
                    None => json!({ "error": message }),
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            AppError::RateLimited { retry_after } => (
                StatusCode::TOO_MANY_REQUESTS,
                [("retry-after", retry_after.to_string())],
                Json(json!({ "error": RATE_LIMIT_MESSAGE })),
            )
                .into_response(),
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response()
            }
            AppError::EmailProvider { detail, expose } => {
                tracing::error!("Brevo API error: {detail}");
                error_500(QUOTE_FAILURE_MESSAGE, &detail, expose)
            }
            AppError::Internal { detail, expose } => {
                tracing::error!("Internal error: {detail}");
                error_500("Internal server error", &detail, expose)
            }
        }
    }
}

fn error_500(message: &str, detail: &str, expose: bool) -> Response {
    let body = if expose {
        json!({ "error": message, "details": detail })
    } else {
        json!({ "error": message })
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
