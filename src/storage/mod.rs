// src/storage/mod.rs
use crate::models::ResumeData;
use crate::utils::error::StorageError;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const PARSED_DIR: &str = "parsed";
const MANIFEST_FILE: &str = "manifest.json";
const ERRORS_FILE: &str = "errors.json";

/// One `parsed/<name>.json` document.
#[derive(Debug, Serialize)]
pub struct ParsedRecord<'a> {
    #[serde(flatten)]
    pub data: &'a ResumeData,
    pub source_file: &'a str,
    pub parsed_at: &'a str,
}

/// Manifest line for a successfully parsed resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedEntry {
    pub source_file: String,
    pub output_file: String,
    pub parsed_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEntry {
    pub file: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct Manifest<'a> {
    pub run_timestamp: &'a str,
    pub total_files: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub parsed_files: &'a [ParsedEntry],
}

/// Writes batch outputs under one output directory.
pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates `<base_dir>/parsed` if it doesn't exist.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(base_path.join(PARSED_DIR))?;
        Ok(Self { base_dir: base_path })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Writes `parsed/<safe_name>.json`; returns the path relative to the output dir.
    pub fn save_parsed(
        &self,
        safe_name: &str,
        data: &ResumeData,
        source_file: &str,
        parsed_at: &str,
    ) -> Result<String, StorageError> {
        let relative = format!("{}/{}.json", PARSED_DIR, safe_name);
        let record = ParsedRecord {
            data,
            source_file,
            parsed_at,
        };
        write_json(&self.base_dir.join(&relative), &record)?;
        Ok(relative)
    }

    pub fn write_manifest(&self, manifest: &Manifest) -> Result<PathBuf, StorageError> {
        let path = self.base_dir.join(MANIFEST_FILE);
        write_json(&path, manifest)?;
        tracing::info!("Manifest written to {}", path.display());
        Ok(path)
    }

    /// Writes `errors.json`; does nothing and returns `None` when there are no errors.
    pub fn write_errors(&self, errors: &[ErrorEntry]) -> Result<Option<PathBuf>, StorageError> {
        if errors.is_empty() {
            return Ok(None);
        }
        let path = self.base_dir.join(ERRORS_FILE);
        write_json(&path, &errors)?;
        tracing::warn!("Errors written to {} ({} failures)", path.display(), errors.len());
        Ok(Some(path))
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;
    fs::write(path, json)?;
    Ok(())
}

/// Moves `file_path` to `<archive_dir>/<timestamp>/<path relative to input_dir>`.
pub fn archive_file(
    file_path: &Path,
    archive_dir: &Path,
    timestamp: &str,
    input_dir: &Path,
) -> Result<PathBuf, StorageError> {
    let relative = file_path
        .strip_prefix(input_dir)
        .map_err(|_| StorageError::OutsideInputDir(file_path.to_path_buf()))?;
    let dest = archive_dir.join(timestamp).join(relative);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    // rename fails across filesystems; fall back to copy + delete.
    if fs::rename(file_path, &dest).is_err() {
        fs::copy(file_path, &dest)?;
        fs::remove_file(file_path)?;
    }

    tracing::info!("Archived: {} -> {}", file_path.display(), dest.display());
    Ok(dest)
}
