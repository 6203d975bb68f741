//! Phone number normalization and loose matching.

/// Trailing digits used as the reverse-lookup index key.
pub const MIN_MATCH_LEN: usize = 7;

/// Length of a national significant number when no country code is present.
const NATIONAL_NUMBER_LEN: usize = 10;

/// Digits of a phone number with all formatting removed.
pub fn digits_only(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normalize a phone number to an E.164-like form.
///
/// - `+...` keeps its digits behind a single `+`
/// - `00...` is treated as an international prefix
/// - a national number of ten digits gets `country_code` prepended
/// - a number that already carries `country_code` in front of ten digits gets a `+`
/// - anything else with at least three digits is kept as bare digits
///
/// Returns `None` for input with fewer than three digits.
pub fn normalize_number(phone: &str, country_code: &str) -> Option<String> {
    let trimmed = phone.trim();
    let digits = digits_only(trimmed);
    if digits.len() < 3 {
        return None;
    }

    if trimmed.starts_with('+') {
        return Some(format!("+{}", digits));
    }

    if let Some(rest) = digits.strip_prefix("00") {
        if rest.len() >= 3 {
            return Some(format!("+{}", rest));
        }
    }

    let cc = digits_only(country_code);
    if !cc.is_empty() && digits.len() == cc.len() + NATIONAL_NUMBER_LEN && digits.starts_with(&cc) {
        return Some(format!("+{}", digits));
    }

    if digits.len() == NATIONAL_NUMBER_LEN && !cc.is_empty() {
        return Some(format!("+{}{}", cc, digits));
    }

    Some(digits)
}

/// Last `MIN_MATCH_LEN` digits of a number (all digits when shorter).
pub fn min_match(phone: &str) -> String {
    let digits = digits_only(phone);
    let start = digits.len().saturating_sub(MIN_MATCH_LEN);
    digits[start..].to_string()
}

/// Check if two phone numbers refer to the same line.
///
/// Equal digit strings match. Otherwise the longer one must end with the
/// shorter one and the shorter one must have at least `MIN_MATCH_LEN` digits,
/// so "15551234567" matches "5551234567".
pub fn numbers_match(phone1: &str, phone2: &str) -> bool {
    let n1 = digits_only(phone1);
    let n2 = digits_only(phone2);

    if n1.is_empty() || n2.is_empty() {
        return false;
    }

    if n1 == n2 {
        return true;
    }

    let (longer, shorter) = if n1.len() > n2.len() { (&n1, &n2) } else { (&n2, &n1) };
    shorter.len() >= MIN_MATCH_LEN && longer.ends_with(shorter.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_national_number() {
        assert_eq!(normalize_number("(555) 123-4567", "1").as_deref(), Some("+15551234567"));
    }

    #[test]
    fn normalize_with_country_code_digits() {
        assert_eq!(normalize_number("1 555 123 4567", "1").as_deref(), Some("+15551234567"));
    }

    #[test]
    fn normalize_keeps_explicit_plus() {
        assert_eq!(normalize_number("+44 20 7946 0958", "1").as_deref(), Some("+442079460958"));
    }

    #[test]
    fn normalize_international_prefix() {
        assert_eq!(normalize_number("0044 20 7946 0958", "1").as_deref(), Some("+442079460958"));
    }

    #[test]
    fn normalize_short_codes_stay_digits() {
        assert_eq!(normalize_number("555", "1").as_deref(), Some("555"));
        assert_eq!(normalize_number("911", "1").as_deref(), Some("911"));
    }

    #[test]
    fn normalize_rejects_too_few_digits() {
        assert_eq!(normalize_number("", "1"), None);
        assert_eq!(normalize_number("ext 1", "1"), None);
    }

    #[test]
    fn min_match_takes_last_seven() {
        assert_eq!(min_match("+1 (555) 123-4567"), "1234567");
        assert_eq!(min_match("555"), "555");
    }

    #[test]
    fn match_with_and_without_country_code() {
        assert!(numbers_match("+15551234567", "555-123-4567"));
        assert!(numbers_match("5551234567", "15551234567"));
    }

    #[test]
    fn short_numbers_need_exact_match() {
        assert!(numbers_match("555", "555"));
        assert!(!numbers_match("1555", "555"));
    }

    #[test]
    fn different_numbers_do_not_match() {
        assert!(!numbers_match("5551234567", "5559999999"));
        assert!(!numbers_match("", ""));
    }
}
