// src/batch.rs
//
// Folder-level driver: discover resumes, pick strategies, parse each file,
// write per-resume JSON, the manifest and errors, then archive what parsed.
use crate::coordinator::ExtractionCoordinator;
use crate::extractors::{
    Field, FieldExtractor, KeywordSkillsExtractor, LlmSkillsExtractor, NerNameExtractor, RegexEmailExtractor,
    RuleBasedNameExtractor,
};
use crate::framework::ParsingOrchestrator;
use crate::llm::GeminiClient;
use crate::parsers::extension_of;
use crate::storage::{self, ErrorEntry, Manifest, ParsedEntry, StorageManager};
use crate::utils::error::AppError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

pub const SUPPORTED_EXTENSIONS: &[&str] = &[".pdf", ".docx"];

/// Value shipped in `.env.example`; never a real key.
pub const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

const RUN_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H%M%S";

static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\w]+").expect("Failed to compile NON_WORD_RE")
});

/// Everything a batch run needs, resolved from CLI flags and environment.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub archive_dir: PathBuf,
    pub archive: bool,
    pub no_llm: bool,
    pub ner_model: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
}

/// Counts for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    /// 0 all parsed, 1 some failed, 2 nothing to do.
    pub fn exit_code(&self) -> i32 {
        if self.total == 0 {
            2
        } else if self.failed > 0 {
            1
        } else {
            0
        }
    }
}

/// Recursively lists `.pdf`/`.docx` files under `input_dir`, sorted.
pub fn discover_resumes(input_dir: &Path) -> Vec<PathBuf> {
    if !input_dir.is_dir() {
        tracing::error!("Input directory does not exist: {}", input_dir.display());
        return Vec::new();
    }

    let mut resumes: Vec<PathBuf> = WalkDir::new(input_dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| SUPPORTED_EXTENSIONS.contains(&extension_of(path).as_str()))
        .collect();
    resumes.sort();

    tracing::info!("Found {} resume(s) in {}", resumes.len(), input_dir.display());
    resumes
}

/// `"John Doe Resume.pdf"` → `"john_doe_resume"`; `"unnamed"` when nothing is left.
pub fn sanitize_filename(name: &str) -> String {
    let stem = Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let lowered = stem.to_lowercase();
    let clean = NON_WORD_RE.replace_all(&lowered, "_");
    let clean = clean.trim_matches('_');
    if clean.is_empty() {
        "unnamed".to_string()
    } else {
        clean.to_string()
    }
}

/// NER when a model is configured and loads; otherwise the heuristic.
pub fn build_name_extractor(ner_model: Option<&str>) -> Arc<dyn FieldExtractor> {
    if let Some(model) = ner_model {
        match NerNameExtractor::load(model) {
            Ok(extractor) => {
                tracing::info!("Using NerNameExtractor ({}) for name extraction", model);
                return Arc::new(extractor);
            }
            Err(e) => tracing::info!("{}; falling back to RuleBasedNameExtractor", e),
        }
    }
    tracing::info!("Using RuleBasedNameExtractor for name extraction");
    Arc::new(RuleBasedNameExtractor::new())
}

/// LLM when allowed and a usable key is present; otherwise keyword matching.
pub fn build_skills_extractor(no_llm: bool, api_key: Option<&str>, model: &str) -> Arc<dyn FieldExtractor> {
    if !no_llm {
        match api_key.map(str::trim) {
            Some(key) if !key.is_empty() && key != PLACEHOLDER_API_KEY => match GeminiClient::new(key, model) {
                Ok(client) => {
                    tracing::info!("Using LlmSkillsExtractor ({}) for skills extraction", model);
                    return Arc::new(LlmSkillsExtractor::new(Arc::new(client)));
                }
                Err(e) => tracing::warn!("Failed to init LLM client: {}; using keyword fallback", e),
            },
            _ => tracing::debug!("No usable GEMINI_API_KEY; LLM skills extraction disabled"),
        }
    }
    tracing::info!("Using KeywordSkillsExtractor for skills extraction");
    Arc::new(KeywordSkillsExtractor::new())
}

/// Builds the default strategy set for a run.
pub fn build_coordinator(config: &BatchConfig) -> Result<ExtractionCoordinator, AppError> {
    let extractors: Vec<(Field, Arc<dyn FieldExtractor>)> = vec![
        (Field::Name, build_name_extractor(config.ner_model.as_deref())),
        (Field::Email, Arc::new(RegexEmailExtractor::new()) as Arc<dyn FieldExtractor>),
        (
            Field::Skills,
            build_skills_extractor(config.no_llm, config.api_key.as_deref(), &config.model),
        ),
    ];
    Ok(ExtractionCoordinator::new(extractors)?)
}

/// Runs the whole batch with the default strategies.
pub fn run(config: &BatchConfig) -> Result<BatchSummary, AppError> {
    let resumes = discover_resumes(&config.input_dir);
    if resumes.is_empty() {
        tracing::warn!("No resume files found in {}", config.input_dir.display());
        return Ok(BatchSummary {
            total: 0,
            succeeded: 0,
            failed: 0,
        });
    }

    let orchestrator = ParsingOrchestrator::new(build_coordinator(config)?);
    run_with(config, &orchestrator, &resumes)
}

/// Processes `resumes` with a ready orchestrator.
pub fn run_with(
    config: &BatchConfig,
    orchestrator: &ParsingOrchestrator,
    resumes: &[PathBuf],
) -> Result<BatchSummary, AppError> {
    let storage = StorageManager::new(&config.output_dir)?;
    let timestamp = chrono::Local::now().format(RUN_TIMESTAMP_FORMAT).to_string();

    let mut parsed_files: Vec<ParsedEntry> = Vec::new();
    let mut errors: Vec<ErrorEntry> = Vec::new();

    for file_path in resumes {
        tracing::info!("Processing: {}", file_path.display());
        match process_file(orchestrator, &storage, file_path) {
            Ok(entry) => {
                tracing::info!("OK: {} -> {}", entry.source_file, entry.output_file);
                parsed_files.push(entry);

                if config.archive {
                    // A failed move leaves the file in place; the parse itself still counts.
                    if let Err(e) = storage::archive_file(file_path, &config.archive_dir, &timestamp, &config.input_dir) {
                        tracing::error!("Failed to archive {}: {}", file_path.display(), e);
                    }
                }
            }
            Err(e) => {
                tracing::error!("FAILED: {}: {}", file_path.display(), e);
                errors.push(ErrorEntry {
                    file: file_path.display().to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    storage.write_manifest(&Manifest {
        run_timestamp: &timestamp,
        total_files: resumes.len(),
        succeeded: parsed_files.len(),
        failed: errors.len(),
        parsed_files: &parsed_files,
    })?;
    storage.write_errors(&errors)?;

    let summary = BatchSummary {
        total: resumes.len(),
        succeeded: parsed_files.len(),
        failed: errors.len(),
    };
    tracing::info!(
        "BATCH COMPLETE: {}/{} succeeded, {} failed",
        summary.succeeded,
        summary.total,
        summary.failed
    );
    Ok(summary)
}

fn process_file(
    orchestrator: &ParsingOrchestrator,
    storage: &StorageManager,
    file_path: &Path,
) -> Result<ParsedEntry, AppError> {
    let data = orchestrator.parse(file_path)?;

    let source_file = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parsed_at = chrono::Utc::now().to_rfc3339();
    let output_file = storage.save_parsed(&sanitize_filename(&source_file), &data, &source_file, &parsed_at)?;

    Ok(ParsedEntry {
        source_file,
        output_file,
        parsed_at,
    })
}
