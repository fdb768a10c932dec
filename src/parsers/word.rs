// src/parsers/word.rs
//
// .docx reader. The body lives in `word/document.xml` inside the zip package;
// text boxes (`w:txbxContent`) are read first because resumes tend to put the
// name and contact block there.
use crate::parsers::{DocumentTextExtractor, ReadError};
use roxmltree::{Document, Node};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const DOCUMENT_PART: &str = "word/document.xml";
const CELL_DELIMITER: &str = " | ";

#[derive(Debug, Clone, Copy, Default)]
pub struct WordParser;

impl WordParser {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentTextExtractor for WordParser {
    fn name(&self) -> &'static str {
        "WordParser"
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        &[".docx"]
    }

    fn extract_text(&self, path: &Path) -> Result<String, ReadError> {
        let file = File::open(path)?;
        let mut archive = zip::ZipArchive::new(file)?;
        let mut xml = String::new();
        archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;

        let text = document_text(&xml)?;
        Ok(text)
    }
}

/// Text boxes, then body paragraphs, then table rows, one line each.
fn document_text(xml: &str) -> Result<String, roxmltree::Error> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();

    // The same text box usually appears twice: once in mc:Choice (DrawingML)
    // and once in mc:Fallback (VML).
    let mut seen = HashSet::new();
    let text_boxes: Vec<String> = root
        .descendants()
        .filter(|n| is_w(n, "p") && n.ancestors().skip(1).any(|a| is_w(&a, "txbxContent")))
        .map(|p| paragraph_text(p).trim().to_string())
        .filter(|line| !line.is_empty() && seen.insert(line.clone()))
        .collect();

    let mut paragraphs = Vec::new();
    let mut table_rows = Vec::new();
    if let Some(body) = root.children().find(|n| is_w(n, "body")) {
        for child in body.children() {
            if is_w(&child, "p") {
                let text = paragraph_text(child);
                let text = text.trim();
                if !text.is_empty() {
                    paragraphs.push(text.to_string());
                }
            } else if is_w(&child, "tbl") {
                table_rows.extend(table_lines(child));
            }
        }
    }

    tracing::debug!(
        "Extracted {} text box lines, {} paragraphs, {} table rows",
        text_boxes.len(),
        paragraphs.len(),
        table_rows.len()
    );

    Ok(text_boxes
        .into_iter()
        .chain(paragraphs)
        .chain(table_rows)
        .collect::<Vec<_>>()
        .join("\n"))
}

fn is_w(node: &Node, name: &str) -> bool {
    node.is_element() && node.has_tag_name((W_NS, name))
}

/// Run text of one paragraph, not descending into nested text boxes.
fn paragraph_text(paragraph: Node) -> String {
    let mut out = String::new();
    collect_runs(paragraph, &mut out);
    out
}

fn collect_runs(node: Node, out: &mut String) {
    for child in node.children() {
        if !child.is_element() {
            continue;
        }
        if is_w(&child, "txbxContent") {
            continue;
        }
        if is_w(&child, "t") {
            out.push_str(child.text().unwrap_or_default());
        } else if is_w(&child, "tab") {
            out.push('\t');
        } else if is_w(&child, "br") || is_w(&child, "cr") {
            out.push('\n');
        } else {
            collect_runs(child, out);
        }
    }
}

/// One line per row: non-empty cell texts joined with `" | "`.
fn table_lines(table: Node) -> Vec<String> {
    table
        .children()
        .filter(|n| is_w(n, "tr"))
        .filter_map(|row| {
            let cells: Vec<String> = row
                .children()
                .filter(|n| is_w(n, "tc"))
                .map(cell_text)
                .filter(|text| !text.is_empty())
                .collect();
            (!cells.is_empty()).then(|| cells.join(CELL_DELIMITER))
        })
        .collect()
}

fn cell_text(cell: Node) -> String {
    cell.children()
        .filter(|n| is_w(n, "p"))
        .map(paragraph_text)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
