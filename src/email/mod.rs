pub mod templates;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::config::Config;

const BREVO_SEND_URL: &str = "https://api.brevo.com/v3/smtp/email";

pub const SENDER_NAME: &str = "Oasis Cleaning Services";
pub const RECIPIENT_NAME: &str = "Oasis Cleaning Admin";

/// One notification, ready to hand to the provider.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
    /// (name, address) of the submitter, when they left an email address.
    pub reply_to: Option<(String, String)>,
    pub tags: Vec<String>,
}

#[derive(Debug)]
pub enum MailerError {
    NotConfigured,
    Request(String),
    Api { status: u16, body: String },
}

impl std::fmt::Display for MailerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MailerError::NotConfigured => write!(f, "BREVO_API_KEY is not set"),
            MailerError::Request(msg) => write!(f, "Brevo request failed: {msg}"),
            MailerError::Api { status, body } => {
                write!(f, "Brevo API returned {status}: {body}")
            }
        }
    }
}

impl std::error::Error for MailerError {}

/// Outbound notification seam. The production implementation talks to
/// Brevo; tests substitute their own.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send the email, returning the provider-assigned message id.
    async fn send(&self, email: OutboundEmail) -> Result<String, MailerError>;
}

/// Transactional-email client for the Brevo (Sendinblue) HTTP API.
pub struct BrevoMailer {
    client: reqwest::Client,
    send_url: String,
    api_key: Option<String>,
    from_email: String,
    to_email: String,
}

impl BrevoMailer {
    pub fn new(config: &Config) -> Self {
        Self::with_send_url(config, BREVO_SEND_URL)
    }

    fn with_send_url(config: &Config, send_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build reqwest client"),
            send_url: send_url.to_string(),
            api_key: config.brevo_api_key.clone(),
            from_email: config.from_email.clone(),
            to_email: config.to_email.clone(),
        }
    }

    fn payload(&self, email: &OutboundEmail) -> Value {
        let mut payload = json!({
            "sender": { "name": SENDER_NAME, "email": self.from_email },
            "to": [{ "email": self.to_email, "name": RECIPIENT_NAME }],
            "subject": email.subject,
            "htmlContent": email.html,
            "textContent": email.text,
            "tags": email.tags,
        });
        if let Some((name, address)) = &email.reply_to {
            payload["replyTo"] = json!({ "email": address, "name": name });
        }
        payload
    }
}

#[async_trait]
impl Mailer for BrevoMailer {
    async fn send(&self, email: OutboundEmail) -> Result<String, MailerError> {
        let api_key = self.api_key.as_deref().ok_or(MailerError::NotConfigured)?;

        let resp = self
            .client
            .post(&self.send_url)
            .header("api-key", api_key)
            .header("accept", "application/json")
            .json(&self.payload(&email))
            .send()
            .await
            .map_err(|e| MailerError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(1024)
                .collect::<String>();
            return Err(MailerError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| MailerError::Request(e.to_string()))?;

        Ok(body["messageId"].as_str().unwrap_or_default().to_string())
    }
}
