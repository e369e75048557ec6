use serde_json::Value;

/// Hidden form field name. Humans never see it; bots fill it.
const HONEYPOT_FIELD: &str = "honeypot";

/// Check if the honeypot field is filled. Returns true if spam detected.
pub fn is_spam(data: &Value) -> bool {
    match data.get(HONEYPOT_FIELD) {
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Null) | None => false,
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_or_absent_honeypot_is_not_spam() {
        assert!(!is_spam(&json!({"full_name": "Jo"})));
        assert!(!is_spam(&json!({"honeypot": ""})));
        assert!(!is_spam(&json!({"honeypot": null})));
    }

    #[test]
    fn filled_honeypot_is_spam() {
        assert!(is_spam(&json!({"honeypot": "buy cheap pills"})));
        assert!(is_spam(&json!({"honeypot": 1})));
    }
}
