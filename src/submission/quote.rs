use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;
use crate::validate;

pub const REQUIRED_FIELDS: [&str; 6] = [
    "full_name",
    "email",
    "phone",
    "postcode",
    "service_type",
    "frequency",
];

/// Raw legacy quote-form payload, straight off the wire. All fields
/// optional at this stage; `validate` promotes it to a `ValidQuote`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuoteRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub postcode: Option<String>,
    pub service_type: Option<String>,
    pub frequency: Option<String>,
    pub property_type: Option<String>,
    pub bedrooms: Option<String>,
    pub message: Option<String>,
    pub preferred_contact: Option<String>,
}

/// A quote request that passed every check.
#[derive(Debug, Clone)]
pub struct ValidQuote {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub postcode: String,
    pub service_type: String,
    pub frequency: String,
    pub property_type: Option<String>,
    pub bedrooms: Option<String>,
    pub message: Option<String>,
    pub preferred_contact: Option<String>,
}

impl QuoteRequest {
    pub fn parse(raw: &Value) -> Result<Self, AppError> {
        serde_json::from_value(raw.clone())
            .map_err(|e| AppError::bad_request(format!("Invalid payload: {e}")))
    }

    pub fn validate(self) -> Result<ValidQuote, AppError> {
        let full_name = required(self.full_name)?;
        let email = required(self.email)?;
        let phone = required(self.phone)?;
        let postcode = required(self.postcode)?;
        let service_type = required(self.service_type)?;
        let frequency = required(self.frequency)?;

        if !validate::is_valid_email(&email) {
            return Err(AppError::bad_request("Invalid email format"));
        }

        if !validate::is_valid_postcode(&postcode) {
            return Err(AppError::bad_request("Invalid UK postcode format"));
        }

        Ok(ValidQuote {
            full_name,
            email,
            phone,
            postcode,
            service_type,
            frequency,
            property_type: non_empty(self.property_type),
            bedrooms: non_empty(self.bedrooms),
            message: non_empty(self.message),
            preferred_contact: non_empty(self.preferred_contact),
        })
    }
}

fn required(field: Option<String>) -> Result<String, AppError> {
    match field {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::missing_fields(&REQUIRED_FIELDS)),
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.trim().is_empty())
}
