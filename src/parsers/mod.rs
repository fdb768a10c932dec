// src/parsers/mod.rs
//
// Document text extraction: file path in, plain text out. Every parser shares
// the same validation; only `extract_text` is format specific.
use crate::utils::error::ResumeError;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

pub mod pdf;
pub mod word;

pub use pdf::PdfParser;
pub use word::WordParser;

/// Boxed cause of a format-level read failure.
pub type ReadError = Box<dyn std::error::Error + Send + Sync>;

/// Lowercased extension with its leading dot (`".pdf"`), or `""` when absent.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

/// Converts one document format into plain text.
pub trait DocumentTextExtractor: Send + Sync {
    /// Short parser name used in logs.
    fn name(&self) -> &'static str;

    /// Lowercase extensions with leading dot, e.g. `".pdf"`.
    fn supported_extensions(&self) -> &'static [&'static str];

    /// Format-specific extraction over an already validated path.
    fn extract_text(&self, path: &Path) -> Result<String, ReadError>;

    /// Validates the path, then extracts its text.
    ///
    /// Checks run in order: the file exists (`NotFound`), it is a regular file
    /// (`InvalidInput`), its extension is supported (`UnsupportedFormat`). Any
    /// read failure afterwards is wrapped in `ExtractionFailure`.
    fn parse(&self, path: &Path) -> Result<String, ResumeError> {
        validate_file(path, self.supported_extensions())?;

        tracing::info!("Parsing file with {}: {}", self.name(), path.display());
        let text = self
            .extract_text(path)
            .map_err(|source| ResumeError::ExtractionFailure {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::info!(
            "Successfully extracted {} characters from {}",
            text.chars().count(),
            path.display()
        );
        Ok(text)
    }
}

fn validate_file(path: &Path, supported: &[&str]) -> Result<(), ResumeError> {
    if path.as_os_str().is_empty() {
        return Err(ResumeError::InvalidInput("file path cannot be empty".to_string()));
    }
    if !path.exists() {
        return Err(ResumeError::NotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(ResumeError::InvalidInput(format!(
            "Path is not a file: {}",
            path.display()
        )));
    }

    let extension = extension_of(path);
    if !supported.contains(&extension.as_str()) {
        return Err(ResumeError::UnsupportedFormat {
            extension,
            supported: supported.iter().map(|s| s.to_string()).collect(),
        });
    }
    Ok(())
}

// --- Registry ---

/// Maps file extensions to the parser that handles them.
#[derive(Clone, Default)]
pub struct ParserRegistry {
    by_extension: BTreeMap<String, Arc<dyn DocumentTextExtractor>>,
}

impl ParserRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// `.pdf` → `PdfParser`, `.docx` → `WordParser`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(PdfParser::new());
        registry.register(WordParser::new());
        registry
    }

    /// Registers a parser under every extension it declares.
    pub fn register<P: DocumentTextExtractor + 'static>(&mut self, parser: P) {
        let parser: Arc<dyn DocumentTextExtractor> = Arc::new(parser);
        for ext in parser.supported_extensions() {
            self.by_extension.insert(ext.to_string(), parser.clone());
        }
    }

    pub fn supported_extensions(&self) -> Vec<String> {
        self.by_extension.keys().cloned().collect()
    }

    pub fn get(&self, extension: &str) -> Option<Arc<dyn DocumentTextExtractor>> {
        self.by_extension.get(&extension.to_ascii_lowercase()).cloned()
    }

    /// Parser for the path's lowercased extension, or `UnsupportedFormat`.
    pub fn resolve(&self, path: &Path) -> Result<Arc<dyn DocumentTextExtractor>, ResumeError> {
        let extension = extension_of(path);
        self.get(&extension).ok_or_else(|| ResumeError::UnsupportedFormat {
            extension,
            supported: self.supported_extensions(),
        })
    }
}
