// src/extractors/skills.rs
use crate::extractors::{validate_input, FieldExtractor, FieldValue};
use crate::llm::TextGenerator;
use crate::utils::error::ResumeError;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::sync::Arc;

/// Built-in keyword list used when no list is supplied.
pub const DEFAULT_SKILLS_KEYWORDS: &[&str] = &[
    // Programming Languages
    "Python", "Java", "JavaScript", "TypeScript", "C++", "C#", "Go", "Rust",
    "Ruby", "PHP", "Swift", "Kotlin", "Scala", "R", "MATLAB", "Perl",
    // Web Technologies
    "HTML", "CSS", "React", "Angular", "Vue.js", "Node.js", "Django",
    "Flask", "FastAPI", "Spring Boot", "Express.js", "Next.js",
    // Data & ML
    "Machine Learning", "Deep Learning", "NLP", "Natural Language Processing",
    "Computer Vision", "TensorFlow", "PyTorch", "Scikit-learn", "Pandas",
    "NumPy", "Data Analysis", "Data Science", "LLM", "Large Language Models",
    "Generative AI", "Neural Networks",
    // Cloud & DevOps
    "AWS", "Azure", "GCP", "Google Cloud", "Docker", "Kubernetes",
    "CI/CD", "Terraform", "Jenkins", "Git", "GitHub", "GitLab",
    // Databases
    "SQL", "NoSQL", "PostgreSQL", "MySQL", "MongoDB", "Redis",
    "Elasticsearch", "DynamoDB", "Cassandra",
    // Other
    "REST API", "GraphQL", "Microservices", "Agile", "Scrum",
    "Project Management", "Leadership", "Communication",
];

/// Case-insensitive, whole-word keyword matcher.
///
/// Output keeps the canonical casing and order of the keyword list, not the
/// order in which skills appear in the text. Matching is lexical only, so
/// "not Rust" still reports "Rust".
#[derive(Debug, Clone)]
pub struct KeywordSkillsExtractor {
    // (canonical keyword, compiled whole-word pattern)
    keywords: Vec<(String, Regex)>,
}

impl KeywordSkillsExtractor {
    /// Extractor over `DEFAULT_SKILLS_KEYWORDS`.
    pub fn new() -> Self {
        Self {
            keywords: DEFAULT_PATTERNS.clone(),
        }
    }

    /// Extractor over a caller-supplied list. An empty list selects the default list.
    pub fn with_keywords<I, S>(keywords: I) -> Result<Self, ResumeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords: Vec<String> = keywords.into_iter().map(Into::into).collect();
        if keywords.is_empty() {
            return Ok(Self::new());
        }

        let compiled = keywords
            .into_iter()
            .map(|keyword| {
                let pattern = compile_keyword(&keyword).map_err(|e| {
                    ResumeError::Configuration(format!("Invalid skill keyword '{}': {}", keyword, e))
                })?;
                Ok((keyword, pattern))
            })
            .collect::<Result<Vec<_>, ResumeError>>()?;

        Ok(Self { keywords: compiled })
    }

    pub fn keywords(&self) -> Vec<&str> {
        self.keywords.iter().map(|(k, _)| k.as_str()).collect()
    }

    pub fn find_skills(&self, text: &str) -> Result<Vec<String>, ResumeError> {
        validate_input(text)?;

        let found: Vec<String> = self
            .keywords
            .iter()
            .filter(|(_, pattern)| pattern.is_match(text))
            .map(|(keyword, _)| keyword.clone())
            .collect();

        tracing::info!("Skills extracted (keyword): {} found", found.len());
        tracing::debug!("Matched skills: {:?}", found);
        Ok(found)
    }
}

impl Default for KeywordSkillsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for KeywordSkillsExtractor {
    fn strategy(&self) -> &'static str {
        "KeywordSkillsExtractor"
    }

    fn extract(&self, text: &str) -> Result<FieldValue, ResumeError> {
        self.find_skills(text).map(FieldValue::List)
    }
}

static DEFAULT_PATTERNS: Lazy<Vec<(String, Regex)>> = Lazy::new(|| {
    DEFAULT_SKILLS_KEYWORDS
        .iter()
        .filter_map(|k| compile_keyword(k).ok().map(|re| (k.to_string(), re)))
        .collect()
});

// `\b` only holds next to a word character, so keywords like "C++" or "C#"
// are bounded by a non-word character or the end of the text instead.
fn compile_keyword(keyword: &str) -> Result<Regex, regex::Error> {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let lead = if keyword.chars().next().is_some_and(is_word) { r"\b" } else { r"(?:^|\W)" };
    let trail = if keyword.chars().last().is_some_and(is_word) { r"\b" } else { r"(?:\W|$)" };
    RegexBuilder::new(&format!("{}{}{}", lead, regex::escape(keyword), trail))
        .case_insensitive(true)
        .build()
}

// --- LLM Strategy ---

// Leading/trailing markdown code fences around a JSON payload
static FENCE_OPEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^```(?:json)?\s*").expect("Failed to compile FENCE_OPEN_RE")
});

static FENCE_CLOSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*```$").expect("Failed to compile FENCE_CLOSE_RE")
});

/// Asks the LLM for a JSON array of skills.
///
/// Unparseable or non-array replies yield an empty list; a failing `generate`
/// call is returned as an error.
#[derive(Clone)]
pub struct LlmSkillsExtractor {
    client: Arc<dyn TextGenerator>,
}

impl LlmSkillsExtractor {
    pub fn new(client: Arc<dyn TextGenerator>) -> Self {
        Self { client }
    }

    fn build_prompt(text: &str) -> String {
        format!(
            "Extract a list of technical and professional skills from the \
             following resume text. Return ONLY a valid JSON array of strings, \
             with no extra text, explanation, or markdown formatting.\n\n\
             Example output: [\"Python\", \"Machine Learning\", \"AWS\"]\n\n\
             Resume text:\n{}",
            text
        )
    }

    pub fn find_skills(&self, text: &str) -> Result<Vec<String>, ResumeError> {
        validate_input(text)?;

        let response = self.client.generate(&Self::build_prompt(text))?;
        let skills = parse_skills_response(&response);
        tracing::info!("Skills extracted (LLM): {} found", skills.len());
        Ok(skills)
    }
}

impl FieldExtractor for LlmSkillsExtractor {
    fn strategy(&self) -> &'static str {
        "LlmSkillsExtractor"
    }

    fn extract(&self, text: &str) -> Result<FieldValue, ResumeError> {
        self.find_skills(text).map(FieldValue::List)
    }
}

fn strip_code_fences(response: &str) -> String {
    let trimmed = response.trim();
    let opened = FENCE_OPEN_RE.replace(trimmed, "");
    FENCE_CLOSE_RE.replace(&opened, "").into_owned()
}

/// Every array element becomes a trimmed string; empty strings are dropped.
fn parse_skills_response(response: &str) -> Vec<String> {
    let payload = strip_code_fences(response);

    let value: serde_json::Value = match serde_json::from_str(&payload) {
        Ok(value) => value,
        Err(_) => {
            let preview: String = payload.chars().take(200).collect();
            tracing::warn!("Failed to parse LLM response as JSON: {}", preview);
            return Vec::new();
        }
    };

    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(s) => s.trim().to_string(),
                // Numbers, booleans and null keep their JSON text ("3", "true", "null")
                other => other.to_string().trim().to_string(),
            })
            .filter(|s| !s.is_empty())
            .collect(),
        other => {
            tracing::warn!(
                "LLM returned non-array JSON ({}). Returning empty list.",
                json_type_name(&other)
            );
            Vec::new()
        }
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
