use chrono::{DateTime, Utc};

use crate::submission::lead::ValidLead;
use crate::submission::quote::ValidQuote;

/// Brevo tag derived from the service type, e.g. "Deep Cleaning" -> "deep-cleaning".
pub fn service_tag(service_type: &str) -> String {
    service_type
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

fn stamp(submitted_at: DateTime<Utc>) -> String {
    submitted_at.format("%d/%m/%Y %H:%M:%S UTC").to_string()
}

pub fn render_quote_text(quote: &ValidQuote, submitted_at: DateTime<Utc>, ip: &str) -> String {
    let not_specified = "Not specified".to_string();
    let message_block = quote
        .message
        .as_ref()
        .map(|m| format!("Additional Information:\n{m}\n\n"))
        .unwrap_or_default();

    format!(
        "NEW QUOTE REQUEST\n\n\
         Contact Details:\n\
         - Name: {name}\n\
         - Email: {email}\n\
         - Phone: {phone}\n\
         - Postcode: {postcode}\n\
         - Preferred Contact: {preferred}\n\n\
         Service Requirements:\n\
         - Service Type: {service}\n\
         - Frequency: {frequency}\n\
         - Property Type: {property}\n\
         - Number of Bedrooms/Rooms: {bedrooms}\n\n\
         {message_block}\
         Submitted: {submitted}\n\
         IP Address: {ip}\n",
        name = quote.full_name,
        email = quote.email,
        phone = quote.phone,
        postcode = quote.postcode,
        preferred = quote.preferred_contact.as_ref().unwrap_or(&not_specified),
        service = quote.service_type,
        frequency = quote.frequency,
        property = quote.property_type.as_ref().unwrap_or(&not_specified),
        bedrooms = quote.bedrooms.as_ref().unwrap_or(&not_specified),
        submitted = stamp(submitted_at),
    )
}

pub fn render_quote_html(quote: &ValidQuote, submitted_at: DateTime<Utc>, ip: &str) -> String {
    let not_specified = "Not specified".to_string();
    let message_block = quote
        .message
        .as_ref()
        .map(|m| {
            format!(
                r#"<div style="background-color: #f0f8f0; padding: 20px; border-left: 4px solid #4CAF50; margin: 20px 0;">
      <h3 style="color: #444; margin-top: 0;">Additional Information</h3>
      <p style="white-space: pre-wrap;">{m}</p>
    </div>"#
            )
        })
        .unwrap_or_default();

    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
    <h2 style="color: #4CAF50; border-bottom: 3px solid #4CAF50; padding-bottom: 10px;">
      New Quote Request
    </h2>

    <div style="background-color: #f9f9f9; padding: 20px; border-radius: 5px; margin: 20px 0;">
      <h3 style="color: #444; margin-top: 0;">Contact Details</h3>
      <p><strong>Name:</strong> {name}</p>
      <p><strong>Email:</strong> <a href="mailto:{email}">{email}</a></p>
      <p><strong>Phone:</strong> <a href="tel:{phone}">{phone}</a></p>
      <p><strong>Postcode:</strong> {postcode}</p>
      <p><strong>Preferred Contact:</strong> {preferred}</p>
    </div>

    <div style="background-color: #fff; padding: 20px; border: 1px solid #ddd; border-radius: 5px; margin: 20px 0;">
      <h3 style="color: #444; margin-top: 0;">Service Requirements</h3>
      <p><strong>Service Type:</strong> {service}</p>
      <p><strong>Frequency:</strong> {frequency}</p>
      <p><strong>Property Type:</strong> {property}</p>
      <p><strong>Number of Bedrooms/Rooms:</strong> {bedrooms}</p>
    </div>

    {message_block}

    <div style="background-color: #f5f5f5; padding: 15px; border-radius: 5px; margin-top: 20px; font-size: 12px; color: #666;">
      <p><strong>Submitted:</strong> {submitted}</p>
      <p><strong>IP Address:</strong> {ip}</p>
    </div>
  </div>"#,
        name = quote.full_name,
        email = quote.email,
        phone = quote.phone,
        postcode = quote.postcode,
        preferred = quote.preferred_contact.as_ref().unwrap_or(&not_specified),
        service = quote.service_type,
        frequency = quote.frequency,
        property = quote.property_type.as_ref().unwrap_or(&not_specified),
        bedrooms = quote.bedrooms.as_ref().unwrap_or(&not_specified),
        submitted = stamp(submitted_at),
    )
}

pub fn render_lead_text(lead: &ValidLead, submitted_at: DateTime<Utc>, ip: &str) -> String {
    let not_given = "Not given".to_string();
    let quote_block = lead
        .quote
        .map(|q| {
            format!(
                "Computed Quote:\n- Total: £{total:.2}\n- Hours: {hours}\n- Hourly Rate: £{rate:.2}\n\n",
                total = q.total,
                hours = q.hours,
                rate = q.hourly_rate,
            )
        })
        .unwrap_or_default();
    let message_block = lead
        .message
        .as_ref()
        .map(|m| format!("Message:\n{m}\n\n"))
        .unwrap_or_default();

    format!(
        "NEW QUOTE LEAD\n\n\
         Contact Details:\n\
         - Name: {name}\n\
         - Email: {email}\n\
         - Phone: {phone}\n\n\
         Service Details:\n\
         - Service Type: {service}\n\
         - Postcode: {postcode}\n\n\
         {quote_block}\
         {message_block}\
         Submitted: {submitted}\n\
         IP Address: {ip}\n",
        name = lead.contact.name.as_ref().unwrap_or(&not_given),
        email = lead.contact.email.as_ref().unwrap_or(&not_given),
        phone = lead.contact.phone.as_ref().unwrap_or(&not_given),
        service = lead.service_type,
        postcode = lead.postcode,
        submitted = stamp(submitted_at),
    )
}

pub fn render_lead_html(lead: &ValidLead, submitted_at: DateTime<Utc>, ip: &str) -> String {
    let not_given = "Not given".to_string();
    let quote_block = lead
        .quote
        .map(|q| {
            format!(
                r#"<div style="background-color: #fff; padding: 20px; border: 1px solid #ddd; border-radius: 5px; margin: 20px 0;">
      <h3 style="color: #444; margin-top: 0;">Computed Quote</h3>
      <p><strong>Total:</strong> £{total:.2}</p>
      <p><strong>Hours:</strong> {hours}</p>
      <p><strong>Hourly Rate:</strong> £{rate:.2}</p>
    </div>"#,
                total = q.total,
                hours = q.hours,
                rate = q.hourly_rate,
            )
        })
        .unwrap_or_default();
    let message_block = lead
        .message
        .as_ref()
        .map(|m| {
            format!(
                r#"<div style="background-color: #f0f8f0; padding: 20px; border-left: 4px solid #4CAF50; margin: 20px 0;">
      <h3 style="color: #444; margin-top: 0;">Message</h3>
      <p style="white-space: pre-wrap;">{m}</p>
    </div>"#
            )
        })
        .unwrap_or_default();

    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
    <h2 style="color: #4CAF50; border-bottom: 3px solid #4CAF50; padding-bottom: 10px;">
      New Quote Lead
    </h2>

    <div style="background-color: #f9f9f9; padding: 20px; border-radius: 5px; margin: 20px 0;">
      <h3 style="color: #444; margin-top: 0;">Contact Details</h3>
      <p><strong>Name:</strong> {name}</p>
      <p><strong>Email:</strong> {email}</p>
      <p><strong>Phone:</strong> {phone}</p>
    </div>

    <div style="background-color: #fff; padding: 20px; border: 1px solid #ddd; border-radius: 5px; margin: 20px 0;">
      <h3 style="color: #444; margin-top: 0;">Service Details</h3>
      <p><strong>Service Type:</strong> {service}</p>
      <p><strong>Postcode:</strong> {postcode}</p>
    </div>

    {quote_block}

    {message_block}

    <div style="background-color: #f5f5f5; padding: 15px; border-radius: 5px; margin-top: 20px; font-size: 12px; color: #666;">
      <p><strong>Submitted:</strong> {submitted}</p>
      <p><strong>IP Address:</strong> {ip}</p>
    </div>
  </div>"#,
        name = lead.contact.name.as_ref().unwrap_or(&not_given),
        email = lead.contact.email.as_ref().unwrap_or(&not_given),
        phone = lead.contact.phone.as_ref().unwrap_or(&not_given),
        service = lead.service_type,
        postcode = lead.postcode,
        submitted = stamp(submitted_at),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::lead::{QuoteTotals, ValidContact, ValidLead};
    use crate::submission::quote::ValidQuote;

    fn sample_quote() -> ValidQuote {
        ValidQuote {
            full_name: "Jo Bloggs".into(),
            email: "jo@example.com".into(),
            phone: "07700 900123".into(),
            postcode: "SW1A 1AA".into(),
            service_type: "Deep Cleaning".into(),
            frequency: "One-off".into(),
            property_type: None,
            bedrooms: Some("3".into()),
            message: Some("Side door sticks".into()),
            preferred_contact: None,
        }
    }

    #[test]
    fn service_tag_slugs_whitespace() {
        assert_eq!(service_tag("Deep  Cleaning"), "deep-cleaning");
        assert_eq!(service_tag("office"), "office");
    }

    #[test]
    fn quote_text_covers_all_sections() {
        let text = render_quote_text(&sample_quote(), Utc::now(), "198.51.100.7");
        assert!(text.contains("Name: Jo Bloggs"));
        assert!(text.contains("Service Type: Deep Cleaning"));
        assert!(text.contains("Property Type: Not specified"));
        assert!(text.contains("Additional Information:\nSide door sticks"));
        assert!(text.contains("IP Address: 198.51.100.7"));
    }

    #[test]
    fn quote_html_omits_message_block_when_absent() {
        let mut quote = sample_quote();
        quote.message = None;
        let html = render_quote_html(&quote, Utc::now(), "198.51.100.7");
        assert!(html.contains("New Quote Request"));
        assert!(!html.contains("Additional Information"));
        assert!(html.contains("mailto:jo@example.com"));
    }

    #[test]
    fn lead_rendering_includes_breakdown() {
        let lead = ValidLead {
            contact: ValidContact {
                name: Some("Jo".into()),
                email: Some("jo@example.com".into()),
                phone: None,
            },
            service_type: "Domestic Cleaning".into(),
            postcode: "EC1A 1BB".into(),
            quote: Some(QuoteTotals {
                total: 76.5,
                hours: 4.5,
                hourly_rate: 17.0,
            }),
            message: None,
        };
        let text = render_lead_text(&lead, Utc::now(), "127.0.0.1");
        assert!(text.contains("Total: £76.50"));
        assert!(text.contains("Phone: Not given"));

        let html = render_lead_html(&lead, Utc::now(), "127.0.0.1");
        assert!(html.contains("Computed Quote"));
        assert!(html.contains("£17.00"));
    }
}
