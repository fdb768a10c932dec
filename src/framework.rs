// src/framework.rs
use crate::coordinator::ExtractionCoordinator;
use crate::models::ResumeData;
use crate::parsers::{DocumentTextExtractor, ParserRegistry};
use crate::utils::error::ResumeError;
use std::path::Path;
use std::sync::Arc;

/// Single entry point: file path in, `ResumeData` out.
///
/// With an explicit parser every file goes through it (and is rejected by it
/// when the extension does not match). Without one, the parser is picked from
/// the registry by lowercased file extension.
pub struct ParsingOrchestrator {
    coordinator: ExtractionCoordinator,
    parser: Option<Arc<dyn DocumentTextExtractor>>,
    registry: ParserRegistry,
}

impl ParsingOrchestrator {
    /// Auto-detect mode over the default `.pdf`/`.docx` registry.
    pub fn new(coordinator: ExtractionCoordinator) -> Self {
        tracing::info!("ParsingOrchestrator initialized (parser mode: auto-detect)");
        Self {
            coordinator,
            parser: None,
            registry: ParserRegistry::with_defaults(),
        }
    }

    pub fn with_parser(coordinator: ExtractionCoordinator, parser: Arc<dyn DocumentTextExtractor>) -> Self {
        tracing::info!("ParsingOrchestrator initialized (parser mode: {})", parser.name());
        Self {
            coordinator,
            parser: Some(parser),
            registry: ParserRegistry::with_defaults(),
        }
    }

    /// Replaces the registry used in auto-detect mode.
    pub fn with_registry(mut self, registry: ParserRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Parses one resume file.
    ///
    /// File-level problems (`NotFound`, `InvalidInput`, `UnsupportedFormat`,
    /// `ExtractionFailure`) are returned; field-level failures only leave that
    /// field at its default.
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<ResumeData, ResumeError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(ResumeError::InvalidInput("file path cannot be empty".to_string()));
        }
        tracing::info!("Parsing resume: {}", path.display());

        let parser = self.resolve_parser(path)?;
        tracing::info!("Using parser: {}", parser.name());

        let raw_text = parser.parse(path)?;
        if raw_text.trim().is_empty() {
            tracing::warn!("No text content extracted from file: {}", path.display());
        }

        let data = self.coordinator.extract(&raw_text);
        if data.is_empty() {
            tracing::warn!("No fields could be extracted from: {}", path.display());
        }
        tracing::info!("Resume parsing complete for: {}", path.display());
        Ok(data)
    }

    fn resolve_parser(&self, path: &Path) -> Result<Arc<dyn DocumentTextExtractor>, ResumeError> {
        if let Some(parser) = &self.parser {
            return Ok(parser.clone());
        }
        let parser = self.registry.resolve(path)?;
        tracing::debug!("Auto-detected {} for {}", parser.name(), path.display());
        Ok(parser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::{Field, FieldExtractor, RegexEmailExtractor};
    use crate::parsers::{PdfParser, ReadError};
    use tempfile::tempdir;

    struct FixedText(&'static str);

    impl DocumentTextExtractor for FixedText {
        fn name(&self) -> &'static str {
            "FixedText"
        }

        fn supported_extensions(&self) -> &'static [&'static str] {
            &[".txt"]
        }

        fn extract_text(&self, _path: &Path) -> Result<String, ReadError> {
            Ok(self.0.to_string())
        }
    }

    fn email_only() -> ExtractionCoordinator {
        ExtractionCoordinator::new(vec![(
            Field::Email,
            Arc::new(RegexEmailExtractor::new()) as Arc<dyn FieldExtractor>,
        )])
        .unwrap()
    }

    #[test]
    fn test_explicit_parser_is_used() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "ignored").unwrap();

        let orchestrator = ParsingOrchestrator::with_parser(email_only(), Arc::new(FixedText("contact: a.b@c.io")));
        let data = orchestrator.parse(&path).unwrap();
        assert_eq!(data.email, "a.b@c.io");
    }

    #[test]
    fn test_explicit_parser_rejects_other_extensions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("resume.docx");
        std::fs::write(&path, "x").unwrap();

        let orchestrator = ParsingOrchestrator::with_parser(email_only(), Arc::new(PdfParser::new()));
        match orchestrator.parse(&path) {
            Err(ResumeError::UnsupportedFormat { extension, supported }) => {
                assert_eq!(extension, ".docx");
                assert_eq!(supported, vec![".pdf"]);
            }
            other => panic!("Expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_auto_detect_unknown_extension() {
        let orchestrator = ParsingOrchestrator::new(email_only());
        let err = orchestrator.parse("resume.txt").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'.txt'"));
        assert!(message.contains(".pdf") && message.contains(".docx"));
    }

    #[test]
    fn test_empty_path_is_invalid_input() {
        let auto = ParsingOrchestrator::new(email_only());
        assert!(matches!(auto.parse(""), Err(ResumeError::InvalidInput(msg)) if msg.contains("empty")));

        let explicit = ParsingOrchestrator::with_parser(email_only(), Arc::new(PdfParser::new()));
        assert!(matches!(explicit.parse(""), Err(ResumeError::InvalidInput(_))));
    }

    #[test]
    fn test_auto_detect_missing_file() {
        let orchestrator = ParsingOrchestrator::new(email_only());
        assert!(matches!(
            orchestrator.parse("/nonexistent/path/resume.pdf"),
            Err(ResumeError::NotFound(_))
        ));
    }

    #[test]
    fn test_custom_registry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.TXT");
        std::fs::write(&path, "x").unwrap();

        let mut registry = ParserRegistry::new();
        registry.register(FixedText("reach me at x@y.org"));
        let orchestrator = ParsingOrchestrator::new(email_only()).with_registry(registry);
        assert_eq!(orchestrator.parse(&path).unwrap().email, "x@y.org");
    }

    #[test]
    fn test_empty_text_yields_default_result() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        std::fs::write(&path, "").unwrap();

        let orchestrator = ParsingOrchestrator::with_parser(email_only(), Arc::new(FixedText("  ")));
        assert_eq!(orchestrator.parse(&path).unwrap(), ResumeData::default());
    }
}
