// src/extractors/email.rs
use crate::extractors::{validate_input, FieldExtractor, FieldValue};
use crate::utils::error::ResumeError;
use once_cell::sync::Lazy;
use regex::Regex;

// --- Regex Patterns (Lazy Static) ---
// Simplified RFC 5322 shape: local part, '@', dotted domain, alphabetic TLD of 2+ chars.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}")
        .expect("Failed to compile EMAIL_RE")
});

/// Finds the first email address in document order.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexEmailExtractor;

impl RegexEmailExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Left-most match, or an empty string.
    pub fn find_email(&self, text: &str) -> Result<String, ResumeError> {
        validate_input(text)?;

        match EMAIL_RE.find(text) {
            Some(m) => {
                tracing::info!("Email extracted: {}", m.as_str());
                Ok(m.as_str().to_string())
            }
            None => {
                tracing::warn!("No email address found in text.");
                Ok(String::new())
            }
        }
    }
}

impl FieldExtractor for RegexEmailExtractor {
    fn strategy(&self) -> &'static str {
        "RegexEmailExtractor"
    }

    fn extract(&self, text: &str) -> Result<FieldValue, ResumeError> {
        self.find_email(text).map(FieldValue::Text)
    }
}
