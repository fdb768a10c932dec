// src/utils/mod.rs
pub mod error;
pub mod logging;

pub use error::{AppError, LlmError, NerError, ResumeError, StorageError}; // Re-export error types for convenience
