use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::TrainedModel;

use super::classifier::{classify, ClassificationResult};
use super::entities::{DocumentEntities, EntityScanner};
use super::extract::{ExtractError, ExtractedFields, ExtractorRegistry};
use super::normalizer::normalize;
use super::vectorizer::vectorize;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Everything the serving layer returns for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub extracted_text: String,
    pub classification: ClassificationResult,
    pub entities: DocumentEntities,
    pub specific_data: ExtractedFields,
}

/// Runs normalize -> vectorize -> classify -> scan -> extract over raw
/// text.
///
/// Holds only read-only state (the trained model, compiled patterns, the
/// extractor registry), so one pipeline is shared across concurrent
/// requests without locking; every per-request value is owned by the call.
pub struct TriagePipeline {
    model: Arc<TrainedModel>,
    scanner: EntityScanner,
    registry: ExtractorRegistry,
}

impl TriagePipeline {
    pub fn new(model: Arc<TrainedModel>) -> PipelineResult<Self> {
        Ok(Self {
            model,
            scanner: EntityScanner::new()?,
            registry: ExtractorRegistry::with_default_extractors()?,
        })
    }

    #[must_use]
    pub fn with_registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    /// Processes one document's recovered text.
    ///
    /// Never fails: a predicted category without a registered extractor
    /// degrades to empty `specific_data` while the rest of the output is
    /// still produced.
    #[must_use]
    pub fn process(&self, raw_text: &str) -> PipelineOutput {
        let tokens = normalize(raw_text);
        let vector = vectorize(&tokens, &self.model);
        let classification = classify(&vector, &self.model);

        tracing::debug!(
            category = %classification.category,
            confidence = classification.confidence,
            tokens = tokens.len(),
            features = vector.len(),
            "classified document"
        );

        let entities = self.scanner.scan(raw_text);

        let specific_data = match self.registry.extract(classification.category, raw_text) {
            Ok(fields) => fields,
            Err(ExtractError::UnknownCategory(category)) => {
                tracing::debug!(%category, "no extractor registered, returning empty fields");
                ExtractedFields::new()
            }
        };

        PipelineOutput {
            extracted_text: raw_text.to_string(),
            classification,
            entities,
            specific_data,
        }
    }
}
