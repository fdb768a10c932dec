// src/extractors/ner.rs
//
// Named-entity name extraction. The recognizer itself is a pluggable backend;
// `NerNameExtractor::load` is the construction-time probe callers use to decide
// between this strategy and `RuleBasedNameExtractor`.
use crate::extractors::{validate_input, FieldExtractor, FieldValue};
use crate::utils::error::{NerError, ResumeError};
use std::sync::Arc;

// The name sits near the top of a resume; this also caps inference cost.
const NER_WINDOW_CHARS: usize = 500;

/// One recognized span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub label: String,
    pub text: String,
}

impl Entity {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }

    /// `PERSON` (OntoNotes-style) or `PER` (CoNLL-style).
    pub fn is_person(&self) -> bool {
        matches!(self.label.as_str(), "PERSON" | "PER")
    }
}

/// A named-entity model: text in, entities in document order out.
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>, NerError>;
}

/// Returns the first person entity found in the opening window of the text.
#[derive(Clone)]
pub struct NerNameExtractor {
    recognizer: Arc<dyn EntityRecognizer>,
}

impl NerNameExtractor {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self { recognizer }
    }

    /// Loads the bundled BERT backend from a local directory or Hub model id.
    ///
    /// Fails with `NerError::ModelUnavailable` when the backend is not compiled
    /// in (`ner` feature) or the model cannot be loaded.
    pub fn load(model: &str) -> Result<Self, NerError> {
        let recognizer = load_backend(model)?;
        tracing::info!("NerNameExtractor initialized with model: {}", model);
        Ok(Self::new(recognizer))
    }

    pub fn find_name(&self, text: &str) -> Result<String, ResumeError> {
        validate_input(text)?;

        let window: String = text.chars().take(NER_WINDOW_CHARS).collect();
        let entities = self.recognizer.recognize(&window)?;

        match entities.iter().find(|e| e.is_person()) {
            Some(entity) => {
                let name = entity.text.trim().to_string();
                tracing::info!("Name extracted (NER): {}", name);
                Ok(name)
            }
            None => {
                tracing::warn!("No person entity found by NER.");
                Ok(String::new())
            }
        }
    }
}

impl FieldExtractor for NerNameExtractor {
    fn strategy(&self) -> &'static str {
        "NerNameExtractor"
    }

    fn extract(&self, text: &str) -> Result<FieldValue, ResumeError> {
        self.find_name(text).map(FieldValue::Text)
    }
}

#[cfg(feature = "ner")]
fn load_backend(model: &str) -> Result<Arc<dyn EntityRecognizer>, NerError> {
    Ok(Arc::new(bert::BertEntityRecognizer::load(model)?))
}

#[cfg(not(feature = "ner"))]
fn load_backend(model: &str) -> Result<Arc<dyn EntityRecognizer>, NerError> {
    Err(NerError::ModelUnavailable(format!(
        "cannot load '{}': built without the `ner` feature",
        model
    )))
}

#[cfg(feature = "ner")]
pub mod bert {
    //! BERT token-classification backend (e.g. `dslim/bert-base-NER`).
    use super::{Entity, EntityRecognizer};
    use crate::utils::error::NerError;
    use candle_core::{DType, Device, Tensor, D};
    use candle_nn::{Linear, Module, VarBuilder};
    use candle_transformers::models::bert::{BertModel, Config};
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use tokenizers::Tokenizer;

    const MAX_TOKENS: usize = 512;

    pub struct BertEntityRecognizer {
        device: Device,
        model: BertModel,
        classifier: Linear,
        tokenizer: Tokenizer,
        id2label: HashMap<usize, String>,
    }

    #[derive(serde::Deserialize)]
    struct LabelConfig {
        id2label: HashMap<String, String>,
    }

    fn unavailable(what: &str, e: impl std::fmt::Display) -> NerError {
        NerError::ModelUnavailable(format!("{}: {}", what, e))
    }

    fn resolve_files(model: &str) -> Result<(PathBuf, PathBuf, PathBuf), NerError> {
        let local = Path::new(model);
        if local.is_dir() {
            return Ok((
                local.join("tokenizer.json"),
                local.join("config.json"),
                local.join("model.safetensors"),
            ));
        }

        let api = hf_hub::api::sync::Api::new().map_err(|e| unavailable("Failed to create HF API", e))?;
        let repo = api.model(model.to_string());
        let tokenizer = repo.get("tokenizer.json").map_err(|e| unavailable("Failed to download tokenizer", e))?;
        let config = repo.get("config.json").map_err(|e| unavailable("Failed to download config", e))?;
        let weights = repo.get("model.safetensors").map_err(|e| unavailable("Failed to download weights", e))?;
        Ok((tokenizer, config, weights))
    }

    impl BertEntityRecognizer {
        pub fn load(model: &str) -> Result<Self, NerError> {
            let device = Device::Cpu;
            let (tokenizer_path, config_path, weights_path) = resolve_files(model)?;

            let tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| unavailable("Failed to load tokenizer", e))?;
            let config_str = std::fs::read_to_string(&config_path).map_err(|e| unavailable("Failed to read config", e))?;
            let config: Config = serde_json::from_str(&config_str).map_err(|e| unavailable("Failed to parse config", e))?;
            let labels: LabelConfig = serde_json::from_str(&config_str).map_err(|e| unavailable("Config has no id2label", e))?;

            let id2label = labels
                .id2label
                .into_iter()
                .filter_map(|(id, label)| id.parse::<usize>().ok().map(|id| (id, label)))
                .collect::<HashMap<_, _>>();

            // SAFETY: weights are memory-mapped read-only.
            #[allow(unsafe_code)]
            let vb = unsafe {
                VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                    .map_err(|e| unavailable("Failed to load weights", e))?
            };

            let bert = BertModel::load(vb.pp("bert"), &config).map_err(|e| unavailable("Failed to create BERT model", e))?;
            let classifier = candle_nn::linear(config.hidden_size, id2label.len(), vb.pp("classifier"))
                .map_err(|e| unavailable("Failed to create classifier head", e))?;

            Ok(Self {
                device,
                model: bert,
                classifier,
                tokenizer,
                id2label,
            })
        }

        fn infer(&self, text: &str) -> Result<Vec<Entity>, candle_core::Error> {
            let encoding = self
                .tokenizer
                .encode(text, true)
                .map_err(|e| candle_core::Error::Msg(format!("Tokenization failed: {}", e)))?;

            let len = encoding.get_ids().len().min(MAX_TOKENS);
            let ids = &encoding.get_ids()[..len];
            let offsets = &encoding.get_offsets()[..len];
            let special = &encoding.get_special_tokens_mask()[..len];

            let input_ids = Tensor::new(ids, &self.device)?.unsqueeze(0)?;
            let token_type_ids = input_ids.zeros_like()?;
            let attention_mask = input_ids.ones_like()?;

            let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
            let logits = self.classifier.forward(&hidden)?;
            let predictions = logits.argmax(D::Minus1)?.squeeze(0)?.to_vec1::<u32>()?;

            // Merge BIO-tagged tokens into spans using character offsets.
            let mut entities = Vec::new();
            let mut current: Option<(String, usize, usize)> = None;
            for (i, class) in predictions.iter().enumerate() {
                if special[i] == 1 {
                    continue;
                }
                let tag = self.id2label.get(&(*class as usize)).map(String::as_str).unwrap_or("O");
                let (start, end) = offsets[i];
                let (prefix, label) = tag.split_once('-').unwrap_or(("O", ""));

                let continues = prefix == "I"
                    && matches!(&current, Some((cur_label, _, _)) if cur_label == label);
                if continues {
                    if let Some((_, _, cur_end)) = current.as_mut() {
                        *cur_end = end;
                    }
                    continue;
                }

                if let Some((done, s, e)) = current.take() {
                    entities.push(Entity::new(done, &text[s..e]));
                }
                if prefix == "B" || prefix == "I" {
                    current = Some((label.to_string(), start, end));
                }
            }
            if let Some((label, s, e)) = current.take() {
                entities.push(Entity::new(label, &text[s..e]));
            }
            Ok(entities)
        }
    }

    impl EntityRecognizer for BertEntityRecognizer {
        fn recognize(&self, text: &str) -> Result<Vec<Entity>, NerError> {
            self.infer(text).map_err(|e| NerError::Inference(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct ScriptedRecognizer {
        entities: Vec<Entity>,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedRecognizer {
        fn with(entities: Vec<Entity>) -> Arc<Self> {
            Arc::new(Self {
                entities,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl EntityRecognizer for ScriptedRecognizer {
        fn recognize(&self, text: &str) -> Result<Vec<Entity>, NerError> {
            self.seen.lock().unwrap().push(text.to_string());
            Ok(self.entities.clone())
        }
    }

    struct BrokenRecognizer;

    impl EntityRecognizer for BrokenRecognizer {
        fn recognize(&self, _text: &str) -> Result<Vec<Entity>, NerError> {
            Err(NerError::Inference("tensor shape mismatch".to_string()))
        }
    }

    #[test]
    fn test_returns_first_person_entity() {
        let recognizer = ScriptedRecognizer::with(vec![
            Entity::new("ORG", "TechCorp"),
            Entity::new("PERSON", " Jane Doe "),
            Entity::new("PER", "John Smith"),
        ]);
        let extractor = NerNameExtractor::new(recognizer);
        assert_eq!(extractor.find_name("Jane Doe at TechCorp").unwrap(), "Jane Doe");
    }

    #[test]
    fn test_accepts_conll_person_label() {
        let extractor = NerNameExtractor::new(ScriptedRecognizer::with(vec![Entity::new("PER", "Ada")]));
        assert_eq!(extractor.find_name("Ada").unwrap(), "Ada");
    }

    #[test]
    fn test_no_person_returns_empty() {
        let extractor = NerNameExtractor::new(ScriptedRecognizer::with(vec![Entity::new("GPE", "Paris")]));
        assert_eq!(extractor.find_name("Paris").unwrap(), "");
    }

    #[test]
    fn test_only_first_500_chars_reach_the_model() {
        let recognizer = ScriptedRecognizer::with(Vec::new());
        let extractor = NerNameExtractor::new(recognizer.clone());
        let text = "é".repeat(800);
        extractor.find_name(&text).unwrap();

        let seen = recognizer.seen.lock().unwrap();
        assert_eq!(seen[0].chars().count(), 500);
    }

    #[test]
    fn test_inference_failure_is_runtime_error() {
        let extractor = NerNameExtractor::new(Arc::new(BrokenRecognizer));
        let err = extractor.extract("Jane Doe").unwrap_err();
        assert!(matches!(err, ResumeError::Ner(NerError::Inference(_))));
        assert!(err.is_runtime_failure());
    }

    #[test]
    fn test_empty_text_raises() {
        let extractor = NerNameExtractor::new(ScriptedRecognizer::with(Vec::new()));
        assert!(matches!(extractor.extract(""), Err(ResumeError::InvalidInput(_))));
    }

    #[cfg(not(feature = "ner"))]
    #[test]
    fn test_load_without_backend_is_unavailable() {
        assert!(matches!(
            NerNameExtractor::load("dslim/bert-base-NER"),
            Err(NerError::ModelUnavailable(_))
        ));
    }
}
