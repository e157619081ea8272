//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Country calling code used when a national-format number is given
pub const DEFAULT_COUNTRY_CODE: &str = "254";

// Kenyan mobile number in national format (07xx / 01xx)
static KENYA_NATIONAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^0[17]\d{8}$").unwrap()
});

// Kenyan mobile number with country code but no '+'
static KENYA_BARE_INTERNATIONAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^254[17]\d{8}$").unwrap()
});

// International phone number regex (E.164 format)
static INTERNATIONAL_PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{7,14}$").unwrap()
});

/// Normalize a phone number by removing common formatting characters
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Check if a phone number is valid (international E.164 format)
pub fn is_valid_international_phone(phone: &str) -> bool {
    let normalized = normalize_phone_number(phone);
    INTERNATIONAL_PHONE_REGEX.is_match(&normalized)
}

/// Check if a phone number is a Kenyan mobile in national format
pub fn is_valid_kenyan_mobile(phone: &str) -> bool {
    let normalized = normalize_phone_number(phone);
    KENYA_NATIONAL_REGEX.is_match(&normalized)
}

/// Check if a phone number is valid in any accepted format
pub fn is_valid_phone(phone: &str) -> bool {
    to_e164(phone).is_some()
}

/// Rewrite an accepted phone number into E.164
///
/// Returns `None` for anything that is not E.164, a Kenyan national mobile
/// number, or a Kenyan number missing its leading `+`.
pub fn to_e164(phone: &str) -> Option<String> {
    let normalized = normalize_phone_number(phone);

    // '+' is only meaningful as the first character
    if normalized.rfind('+').is_some_and(|pos| pos > 0) {
        return None;
    }

    if KENYA_NATIONAL_REGEX.is_match(&normalized) {
        return Some(format!("+{}{}", DEFAULT_COUNTRY_CODE, &normalized[1..]));
    }
    if KENYA_BARE_INTERNATIONAL_REGEX.is_match(&normalized) {
        return Some(format!("+{}", normalized));
    }
    if INTERNATIONAL_PHONE_REGEX.is_match(&normalized) {
        return Some(normalized);
    }
    None
}

/// Mask a phone number for display and logs (e.g., +25****5678)
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = normalize_phone_number(phone);
    if normalized.len() >= 7 {
        format!(
            "{}****{}",
            &normalized[0..3],
            &normalized[normalized.len() - 4..]
        )
    } else {
        "****".to_string()
    }
}
