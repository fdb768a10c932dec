// src/extractors/mod.rs
//
// Field extraction strategies. Each strategy derives one resume attribute from
// raw text; the coordinator decides which strategy runs for which field.
use crate::utils::error::ResumeError;
use std::fmt;
use std::str::FromStr;

pub mod email;
pub mod name;
pub mod ner;
pub mod skills;

// Re-export key extraction types for convenience
pub use email::RegexEmailExtractor;
pub use name::{LlmNameExtractor, RuleBasedNameExtractor};
pub use ner::{Entity, EntityRecognizer, NerNameExtractor};
pub use skills::{KeywordSkillsExtractor, LlmSkillsExtractor, DEFAULT_SKILLS_KEYWORDS};

// --- Field Keys ---

/// The fixed set of fields a coordinator can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Skills,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Skills => "skills",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = ResumeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Field::Name),
            "email" => Ok(Field::Email),
            "skills" => Ok(Field::Skills),
            other => Err(ResumeError::Configuration(format!(
                "unknown field '{}', expected one of: name, email, skills",
                other
            ))),
        }
    }
}

// --- Field Values ---

/// What a field extractor produces: a string for name/email, an ordered list for skills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn into_text(self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }

    pub fn into_list(self) -> Option<Vec<String>> {
        match self {
            FieldValue::List(v) => Some(v),
            FieldValue::Text(_) => None,
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(v: Vec<String>) -> Self {
        FieldValue::List(v)
    }
}

// --- Strategy Trait ---

/// A strategy that derives one resume attribute from raw text.
///
/// Implementations hold only static configuration, so one instance can be
/// shared read-only across documents and threads.
pub trait FieldExtractor: Send + Sync {
    /// Short strategy name used in logs.
    fn strategy(&self) -> &'static str;

    /// Extracts the field value. Empty or whitespace-only text fails with
    /// `ResumeError::InvalidInput` before any extraction logic runs.
    fn extract(&self, text: &str) -> Result<FieldValue, ResumeError>;
}

/// Shared precondition for every strategy.
pub(crate) fn validate_input(text: &str) -> Result<(), ResumeError> {
    if text.trim().is_empty() {
        return Err(ResumeError::InvalidInput(
            "input text cannot be empty".to_string(),
        ));
    }
    Ok(())
}
