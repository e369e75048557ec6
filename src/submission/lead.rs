use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;
use crate::validate;

/// Raw quote-lead payload: the newer structured form posted by the online
/// quote calculator. Contact details live in a nested block and, for
/// calculator-driven services, a computed price breakdown rides along.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuoteLead {
    pub contact: ContactBlock,
    pub service_type: Option<String>,
    pub postcode: Option<String>,
    pub quote: Option<QuoteBreakdown>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactBlock {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuoteBreakdown {
    pub total: Option<f64>,
    pub hours: Option<f64>,
    pub hourly_rate: Option<f64>,
}

/// A lead that passed every check. `contact` is guaranteed to carry an
/// email address or a phone number (or both).
#[derive(Debug, Clone)]
pub struct ValidLead {
    pub contact: ValidContact,
    pub service_type: String,
    pub postcode: String,
    pub quote: Option<QuoteTotals>,
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ValidContact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct QuoteTotals {
    pub total: f64,
    pub hours: f64,
    pub hourly_rate: f64,
}

impl QuoteLead {
    pub fn parse(raw: &Value) -> Result<Self, AppError> {
        if !raw.is_object() {
            return Err(AppError::bad_request("Missing request payload"));
        }
        serde_json::from_value(raw.clone())
            .map_err(|e| AppError::bad_request(format!("Invalid payload: {e}")))
    }

    pub fn validate(self) -> Result<ValidLead, AppError> {
        let service_type = self
            .service_type
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::bad_request("Missing required field: service_type"))?;

        let postcode = self
            .postcode
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::bad_request("Missing required field: postcode"))?;

        let name = self.contact.name.filter(|v| !v.trim().is_empty());
        let email = self.contact.email.filter(|v| !v.trim().is_empty());
        let phone = self.contact.phone.filter(|v| !v.trim().is_empty());

        if email.is_none() && phone.is_none() {
            return Err(AppError::bad_request(
                "Missing contact details: provide an email address or phone number",
            ));
        }

        if let Some(email) = &email {
            if !validate::is_valid_email(email) {
                return Err(AppError::bad_request("Invalid email format"));
            }
        }

        if !validate::is_valid_postcode(&postcode) {
            return Err(AppError::bad_request("Invalid UK postcode format"));
        }

        let quote = match self.quote.as_ref().and_then(QuoteBreakdown::totals) {
            Some(totals) => Some(totals),
            None if is_office_service(&service_type) => None,
            None => {
                return Err(match self.quote {
                    None => AppError::bad_request("Missing quote breakdown"),
                    Some(_) => AppError::bad_request(
                        "Invalid quote breakdown: total, hours and hourly_rate are required numbers",
                    ),
                });
            }
        };

        Ok(ValidLead {
            contact: ValidContact { name, email, phone },
            service_type,
            postcode,
            quote,
            message: self.message.filter(|v| !v.trim().is_empty()),
        })
    }
}

impl QuoteBreakdown {
    fn totals(&self) -> Option<QuoteTotals> {
        Some(QuoteTotals {
            total: self.total?,
            hours: self.hours?,
            hourly_rate: self.hourly_rate?,
        })
    }
}

/// Office enquiries are quoted by a human, so no computed breakdown exists.
fn is_office_service(service_type: &str) -> bool {
    service_type.to_ascii_lowercase().contains("office")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn domestic_payload() -> Value {
        json!({
            "contact": {"name": "Jo Bloggs", "email": "jo@example.com"},
            "service_type": "Domestic Cleaning",
            "postcode": "EC1A 1BB",
            "quote": {"total": 76.5, "hours": 4.5, "hourly_rate": 17.0},
        })
    }

    #[test]
    fn domestic_lead_with_breakdown_validates() {
        let lead = QuoteLead::parse(&domestic_payload())
            .unwrap()
            .validate()
            .unwrap();
        assert_eq!(lead.service_type, "Domestic Cleaning");
        let totals = lead.quote.unwrap();
        assert_eq!(totals.total, 76.5);
        assert_eq!(totals.hours, 4.5);
    }

    #[test]
    fn office_lead_needs_no_breakdown() {
        let payload = json!({
            "contact": {"phone": "07700 900123"},
            "service_type": "Office Cleaning",
            "postcode": "SW1A 1AA",
        });
        let lead = QuoteLead::parse(&payload).unwrap().validate().unwrap();
        assert!(lead.quote.is_none());
        assert_eq!(lead.contact.phone.as_deref(), Some("07700 900123"));
    }

    #[test]
    fn non_office_lead_without_breakdown_is_rejected() {
        let mut payload = domestic_payload();
        payload.as_object_mut().unwrap().remove("quote");
        let err = QuoteLead::parse(&payload).unwrap().validate().unwrap_err();
        assert!(err.to_string().contains("Missing quote breakdown"));
    }

    #[test]
    fn partial_breakdown_is_rejected() {
        let mut payload = domestic_payload();
        payload["quote"] = json!({"total": 76.5});
        let err = QuoteLead::parse(&payload).unwrap().validate().unwrap_err();
        assert!(err.to_string().contains("Invalid quote breakdown"));
    }

    #[test]
    fn contact_must_have_email_or_phone() {
        let mut payload = domestic_payload();
        payload["contact"] = json!({"name": "Jo Bloggs"});
        let err = QuoteLead::parse(&payload).unwrap().validate().unwrap_err();
        assert!(err.to_string().contains("Missing contact details"));
    }

    #[test]
    fn non_object_payload_is_rejected() {
        assert!(QuoteLead::parse(&json!("hello")).is_err());
        assert!(QuoteLead::parse(&json!(null)).is_err());
    }

    #[test]
    fn invalid_postcode_is_rejected() {
        let mut payload = domestic_payload();
        payload["postcode"] = json!("ZZ99");
        let err = QuoteLead::parse(&payload).unwrap().validate().unwrap_err();
        assert!(err.to_string().contains("Invalid UK postcode format"));
    }
}
