// src/models/mod.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured candidate information extracted from one resume.
///
/// Serializes with the stable key order `name`, `email`, `skills`, which is
/// what the manifest and per-resume JSON files rely on regardless of which
/// extraction strategies produced the values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Match order, duplicates kept.
    #[serde(default)]
    pub skills: Vec<String>,
}

impl ResumeData {
    pub fn new(name: impl Into<String>, email: impl Into<String>, skills: Vec<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            skills,
        }
    }

    /// Canonical key-ordered mapping (`name`, `email`, `skills`).
    pub fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        map.insert("name".to_string(), serde_json::Value::from(self.name.clone()));
        map.insert("email".to_string(), serde_json::Value::from(self.email.clone()));
        map.insert("skills".to_string(), serde_json::Value::from(self.skills.clone()));
        map
    }

    /// Pretty JSON with 2-space indentation.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.skills.is_empty()
    }
}

impl fmt::Display for ResumeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let skills = if self.skills.is_empty() {
            "None".to_string()
        } else {
            self.skills.join(", ")
        };
        write!(
            f,
            "ResumeData(name={:?}, email={:?}, skills=[{}])",
            self.name, self.email, skills
        )
    }
}
