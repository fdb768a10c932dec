// src/parsers/pdf.rs
use crate::parsers::{DocumentTextExtractor, ReadError};
use lopdf::Document;
use std::path::Path;

/// Reads every page in order and joins the non-empty page texts with newlines.
///
/// A page that yields no text, or whose content stream cannot be decoded, is
/// skipped rather than failing the document.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfParser;

impl PdfParser {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentTextExtractor for PdfParser {
    fn name(&self) -> &'static str {
        "PdfParser"
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        &[".pdf"]
    }

    fn extract_text(&self, path: &Path) -> Result<String, ReadError> {
        let doc = Document::load(path)?;

        let mut pages_text: Vec<String> = Vec::new();
        for (page_num, _page_id) in doc.get_pages() {
            match doc.extract_text(&[page_num]) {
                Ok(text) if !text.trim().is_empty() => {
                    let text = text.trim().to_string();
                    tracing::debug!("Page {}: extracted {} characters", page_num, text.chars().count());
                    pages_text.push(text);
                }
                Ok(_) => tracing::debug!("Page {}: no extractable text found", page_num),
                Err(e) => tracing::debug!("Page {}: text extraction failed: {}", page_num, e),
            }
        }

        Ok(pages_text.join("\n"))
    }
}
