// src/coordinator.rs
use crate::extractors::{Field, FieldExtractor, FieldValue};
use crate::models::ResumeData;
use crate::utils::error::ResumeError;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Runs one configured strategy per field and assembles a `ResumeData`.
///
/// A failing strategy never fails the whole extraction: its field gets the
/// type default and a warning is logged, and the remaining fields still run.
pub struct ExtractionCoordinator {
    extractors: BTreeMap<Field, Arc<dyn FieldExtractor>>,
}

impl ExtractionCoordinator {
    /// Fails with `ResumeError::Configuration` when no extractor is given or a
    /// field is configured twice.
    pub fn new<I>(extractors: I) -> Result<Self, ResumeError>
    where
        I: IntoIterator<Item = (Field, Arc<dyn FieldExtractor>)>,
    {
        let mut by_field: BTreeMap<Field, Arc<dyn FieldExtractor>> = BTreeMap::new();
        for (field, extractor) in extractors {
            if by_field.insert(field, extractor).is_some() {
                return Err(ResumeError::Configuration(format!(
                    "More than one extractor configured for field '{}'.",
                    field
                )));
            }
        }
        if by_field.is_empty() {
            return Err(ResumeError::Configuration(
                "At least one field extractor must be provided.".to_string(),
            ));
        }

        tracing::info!(
            "ExtractionCoordinator initialized with extractors: {:?}",
            by_field.keys().map(Field::as_str).collect::<Vec<_>>()
        );
        Ok(Self { extractors: by_field })
    }

    /// Copy of the configured mapping; changes to it do not affect the coordinator.
    pub fn extractors(&self) -> BTreeMap<Field, Arc<dyn FieldExtractor>> {
        self.extractors.clone()
    }

    pub fn fields(&self) -> Vec<Field> {
        self.extractors.keys().copied().collect()
    }

    pub fn extract(&self, text: &str) -> ResumeData {
        tracing::info!("Starting field extraction...");
        let mut data = ResumeData::default();

        for (field, extractor) in &self.extractors {
            tracing::info!("Extracting field '{}' using {}", field, extractor.strategy());

            let value = match extractor.extract(text) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!("Failed to extract field '{}': {}. Using default value.", field, e);
                    continue;
                }
            };

            if assign(&mut data, *field, value) {
                tracing::info!("Field '{}' extracted successfully.", field);
            } else {
                tracing::warn!(
                    "Extractor {} returned the wrong value shape for field '{}'. Using default value.",
                    extractor.strategy(),
                    field
                );
            }
        }

        tracing::info!("Extraction complete: {}", data);
        data
    }
}

/// Stores `value` in its field; false when the shape does not fit the field.
fn assign(data: &mut ResumeData, field: Field, value: FieldValue) -> bool {
    match field {
        Field::Name => value.into_text().map(|s| data.name = s).is_some(),
        Field::Email => value.into_text().map(|s| data.email = s).is_some(),
        Field::Skills => value.into_list().map(|v| data.skills = v).is_some(),
    }
}
