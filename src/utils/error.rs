// src/utils/error.rs
use std::path::PathBuf;
use thiserror::Error;

// Define specific error types for different parts of the application

/// Failures of the LLM backend. These are infrastructure failures, never "field not found".
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Failures of the named-entity backend.
#[derive(Error, Debug)]
pub enum NerError {
    /// Raised at construction time only, so callers can fall back to the heuristic extractor.
    #[error("NER model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("NER inference failed: {0}")]
    Inference(String),
}

/// Errors raised by the parsing pipeline: text extraction, field extraction and setup.
#[derive(Error, Debug)]
pub enum ResumeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unsupported file extension '{extension}'. Expected one of: {}", .supported.join(", "))]
    UnsupportedFormat {
        extension: String,
        supported: Vec<String>,
    },

    #[error("Failed to extract text from '{}': {source}", .path.display())]
    ExtractionFailure {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("NER failed: {0}")]
    Ner(#[from] NerError),
}

impl ResumeError {
    /// True for downstream service failures (LLM or NER backend).
    pub fn is_runtime_failure(&self) -> bool {
        matches!(self, ResumeError::Llm(_) | ResumeError::Ner(_))
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Path {} is outside the input directory", .0.display())]
    OutsideInputDir(PathBuf),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Resume pipeline failed: {0}")]
    Resume(#[from] ResumeError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
