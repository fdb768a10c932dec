// src/extractors/name.rs
use crate::extractors::{validate_input, FieldExtractor, FieldValue};
use crate::llm::TextGenerator;
use crate::utils::error::ResumeError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

// --- Regex Patterns (Lazy Static) ---
// Lines made only of digits and phone punctuation
static PHONE_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\d()+\-\s]+$").expect("Failed to compile PHONE_LINE_RE")
});

static TITLE_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(Mr\.|Mrs\.|Ms\.|Dr\.|Prof\.)\s*").expect("Failed to compile TITLE_PREFIX_RE")
});

// Letters, spaces, periods, hyphens, apostrophes
static NAME_CHARS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z\s.\-']+$").expect("Failed to compile NAME_CHARS_RE")
});

/// Takes the first meaningful line of the resume as the candidate name.
///
/// Blank lines, lines containing `@` and phone-number lines are skipped. The
/// first remaining line is accepted only if, after stripping a courtesy title,
/// it looks like a name; otherwise the extractor keeps scanning.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedNameExtractor;

impl RuleBasedNameExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn find_name(&self, text: &str) -> Result<String, ResumeError> {
        validate_input(text)?;

        for line in text.trim().lines() {
            let cleaned = line.trim();
            if cleaned.is_empty() || cleaned.contains('@') || PHONE_LINE_RE.is_match(cleaned) {
                continue;
            }

            let name = TITLE_PREFIX_RE.replace(cleaned, "");
            let name = name.trim();

            if !name.is_empty() && NAME_CHARS_RE.is_match(name) {
                tracing::info!("Name extracted (rule-based): {}", name);
                return Ok(name.to_string());
            }
        }

        tracing::warn!("No name found using rule-based extraction.");
        Ok(String::new())
    }
}

impl FieldExtractor for RuleBasedNameExtractor {
    fn strategy(&self) -> &'static str {
        "RuleBasedNameExtractor"
    }

    fn extract(&self, text: &str) -> Result<FieldValue, ResumeError> {
        self.find_name(text).map(FieldValue::Text)
    }
}

// --- LLM Strategy ---

const UNKNOWN_MARKER: &str = "UNKNOWN";

/// Asks the LLM for the candidate's full name.
///
/// A failing `generate` call is returned as an error, not an empty name.
#[derive(Clone)]
pub struct LlmNameExtractor {
    client: Arc<dyn TextGenerator>,
}

impl LlmNameExtractor {
    pub fn new(client: Arc<dyn TextGenerator>) -> Self {
        Self { client }
    }

    fn build_prompt(text: &str) -> String {
        format!(
            "Extract the full name of the person from the following resume text. \
             Return ONLY the full name as a plain string with no extra text, \
             quotes, or formatting. If no name is found, return '{}'.\n\n\
             Resume text:\n{}",
            UNKNOWN_MARKER, text
        )
    }

    pub fn find_name(&self, text: &str) -> Result<String, ResumeError> {
        validate_input(text)?;

        let response = self.client.generate(&Self::build_prompt(text))?;
        let name = clean_name_response(&response);

        if name.is_empty() {
            tracing::warn!("LLM could not identify a name in the text.");
        } else {
            tracing::info!("Name extracted (LLM): {}", name);
        }
        Ok(name)
    }
}

impl FieldExtractor for LlmNameExtractor {
    fn strategy(&self) -> &'static str {
        "LlmNameExtractor"
    }

    fn extract(&self, text: &str) -> Result<FieldValue, ResumeError> {
        self.find_name(text).map(FieldValue::Text)
    }
}

/// Trims whitespace then quotes; `UNKNOWN` (any case) means not found.
fn clean_name_response(response: &str) -> String {
    let name = response.trim().trim_matches('"').trim_matches('\'');
    if name.eq_ignore_ascii_case(UNKNOWN_MARKER) {
        String::new()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::LlmError;
    use std::sync::Mutex;

    fn rule_based(text: &str) -> String {
        RuleBasedNameExtractor::new().find_name(text).unwrap()
    }

    #[test]
    fn test_extract_name_from_first_line() {
        let text = "Jane Doe\njane.doe@gmail.com | (555) 123-4567\n\nSkills\nPython";
        assert_eq!(rule_based(text), "Jane Doe");
    }

    #[test]
    fn test_extract_name_skips_email_and_phone_lines() {
        assert_eq!(rule_based("john@example.com\nJohn Smith"), "John Smith");
        assert_eq!(rule_based("\n\n(555) 123-4567\n+1 555 000 1111\nJohn Smith"), "John Smith");
    }

    #[test]
    fn test_extract_name_removes_title_prefix() {
        assert_eq!(rule_based("Dr. James Wilson\nCardiologist"), "James Wilson");
        assert_eq!(rule_based("mrs. Ada Lovelace"), "Ada Lovelace");
        assert_eq!(rule_based("PROF.Alan Turing"), "Alan Turing");
    }

    #[test]
    fn test_extract_name_handles_hyphen_and_apostrophe() {
        assert_eq!(rule_based("Mary-Jane Watson"), "Mary-Jane Watson");
        assert_eq!(rule_based("Conan O'Brien"), "Conan O'Brien");
    }

    #[test]
    fn test_extract_name_skips_lines_that_are_not_names() {
        // First content line has digits, so the next qualifying line wins.
        assert_eq!(rule_based("Resume 2024\nJane Doe"), "Jane Doe");
    }

    #[test]
    fn test_extract_no_valid_name() {
        assert_eq!(rule_based("12345\n(555) 000-0000\nC++ / Rust #1"), "");
    }

    #[test]
    fn test_extract_empty_text_raises() {
        let extractor = RuleBasedNameExtractor::new();
        assert!(matches!(extractor.extract(" \n"), Err(ResumeError::InvalidInput(_))));
    }

    // --- LLM strategy ---

    struct MockGenerator {
        reply: Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl MockGenerator {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    impl TextGenerator for MockGenerator {
        fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(LlmError::Api {
                    status: 503,
                    message: message.clone(),
                }),
            }
        }
    }

    #[test]
    fn test_llm_extract_name_success() {
        let client = MockGenerator::replying("Jane Doe");
        let extractor = LlmNameExtractor::new(client.clone());
        assert_eq!(extractor.find_name("some resume").unwrap(), "Jane Doe");
    }

    #[test]
    fn test_llm_extract_name_strips_quotes_and_whitespace() {
        let extractor = LlmNameExtractor::new(MockGenerator::replying("  \"Jane Doe\"\n"));
        assert_eq!(extractor.find_name("text").unwrap(), "Jane Doe");
        let extractor = LlmNameExtractor::new(MockGenerator::replying("'John Smith'"));
        assert_eq!(extractor.find_name("text").unwrap(), "John Smith");
    }

    #[test]
    fn test_llm_unknown_returns_empty() {
        let extractor = LlmNameExtractor::new(MockGenerator::replying("unknown"));
        assert_eq!(extractor.find_name("text").unwrap(), "");
        let extractor = LlmNameExtractor::new(MockGenerator::replying("\"UNKNOWN\""));
        assert_eq!(extractor.find_name("text").unwrap(), "");
    }

    #[test]
    fn test_llm_prompt_embeds_resume_text() {
        let client = MockGenerator::replying("Jane Doe");
        let extractor = LlmNameExtractor::new(client.clone());
        extractor.find_name("Jane Doe\njane@x.io").unwrap();

        let prompts = client.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Resume text:\nJane Doe\njane@x.io"));
        assert!(prompts[0].contains("UNKNOWN"));
    }

    #[test]
    fn test_llm_empty_text_raises_without_calling_client() {
        let client = MockGenerator::replying("Jane Doe");
        let extractor = LlmNameExtractor::new(client.clone());
        assert!(matches!(extractor.extract(""), Err(ResumeError::InvalidInput(_))));
        assert!(client.prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_llm_api_failure_propagates() {
        let extractor = LlmNameExtractor::new(MockGenerator::failing("quota exceeded"));
        let err = extractor.extract("Jane Doe").unwrap_err();
        assert!(err.is_runtime_failure());
        assert!(err.to_string().contains("quota exceeded"));
    }
}
