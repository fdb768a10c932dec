// src/lib.rs
//! Resume parsing: document text extraction plus pluggable per-field
//! extraction strategies (name, email, skills).
//!
//! ```no_run
//! use resume_extractor::{ExtractionCoordinator, ParsingOrchestrator};
//! use resume_extractor::extractors::{Field, FieldExtractor, KeywordSkillsExtractor, RegexEmailExtractor, RuleBasedNameExtractor};
//! use std::sync::Arc;
//!
//! let coordinator = ExtractionCoordinator::new(vec![
//!     (Field::Name, Arc::new(RuleBasedNameExtractor::new()) as Arc<dyn FieldExtractor>),
//!     (Field::Email, Arc::new(RegexEmailExtractor::new()) as Arc<dyn FieldExtractor>),
//!     (Field::Skills, Arc::new(KeywordSkillsExtractor::new()) as Arc<dyn FieldExtractor>),
//! ])?;
//! let data = ParsingOrchestrator::new(coordinator).parse("resumes/jane_doe.docx")?;
//! println!("{}", data.to_json()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod batch;
pub mod coordinator;
pub mod extractors;
pub mod framework;
pub mod llm;
pub mod models;
pub mod parsers;
pub mod storage;
pub mod utils;

pub use coordinator::ExtractionCoordinator;
pub use framework::ParsingOrchestrator;
pub use models::ResumeData;
pub use utils::error::ResumeError;
