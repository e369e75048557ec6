use std::sync::LazyLock;

use regex::Regex;

/// Lenient two-part shape: something@something.something, no whitespace.
/// Deliberately not RFC 5322; the goal is catching typos, not policing mail.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// UK postcode grammar: GIR 0AA special case, then area letters, district
/// digits, optional subdivision letter, sector digit and two unit letters.
static POSTCODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([Gg][Ii][Rr] 0[Aa]{2})$|^((([A-Za-z][0-9]{1,2})|(([A-Za-z][A-Ha-hJ-Yj-y][0-9]{1,2})|(([A-Za-z][0-9][A-Za-z])|([A-Za-z][A-Ha-hJ-Yj-y][0-9]?[A-Za-z]))))\s?[0-9][A-Za-z]{2})$",
    )
    .unwrap()
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Trims surrounding whitespace before matching; case-insensitive by
/// construction of the pattern.
pub fn is_valid_postcode(postcode: &str) -> bool {
    POSTCODE_RE.is_match(postcode.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_emails() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("jane.doe+quotes@example.org.uk"));
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn accepts_uk_postcodes() {
        assert!(is_valid_postcode("SW1A 1AA"));
        assert!(is_valid_postcode("EC1A 1BB"));
        assert!(is_valid_postcode("GIR 0AA"));
        assert!(is_valid_postcode("m1 1ae"));
        assert!(is_valid_postcode("  B33 8TH  "));
        assert!(is_valid_postcode("CR26XH"));
    }

    #[test]
    fn rejects_non_postcodes() {
        assert!(!is_valid_postcode("12345"));
        assert!(!is_valid_postcode(""));
        assert!(!is_valid_postcode("ZZ99"));
        assert!(!is_valid_postcode("SW1A 1AAA"));
    }
}
