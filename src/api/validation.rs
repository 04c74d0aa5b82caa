//! Input validation for auth requests.

/// Normalize an email for storage and lookup: trim surrounding whitespace
/// and lower-case. Registration and login must agree on this or duplicate
/// checks miss.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Trimmed, non-empty field value. Used for names and emails.
pub fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Passwords are taken verbatim (leading/trailing whitespace is
/// significant); only absence is rejected.
pub fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}
