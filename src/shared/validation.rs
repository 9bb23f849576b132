use lazy_static::lazy_static;
use regex::Regex;

use crate::core::error::{AppError, Result};

lazy_static! {
    /// Regex for upstream resource identifiers (cases, victims, evidence)
    /// Safe to embed as a single URL path segment
    /// - Valid: "665f1c2e9b1d4a0012ab34cd", "case_42", "victim-7"
    /// - Invalid: "", "../cases", "a b", "id?x=1"
    pub static ref IDENTIFIER_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_-]{1,64}$").unwrap();
}

/// Reject identifiers that cannot be forwarded as an upstream path segment
pub fn ensure_identifier(label: &str, value: &str) -> Result<()> {
    if IDENTIFIER_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{} must be 1-64 characters of letters, digits, '-' or '_'",
            label
        )))
    }
}
