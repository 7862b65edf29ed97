use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::category::Category;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model unavailable: {0}")]
    Unavailable(#[from] std::io::Error),
    #[error("Malformed model file: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;

/// One linear decision function: score = dot(weights, features) + bias.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub weights: Vec<f64>,
    pub bias: f64,
}

/// Immutable artifact produced by offline training.
///
/// Loaded once at process startup and shared read-only across all
/// requests. Construction always validates the dimensional invariants, so
/// holders of a `TrainedModel` can index into `idf` and classifier weights
/// without re-checking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ModelData")]
pub struct TrainedModel {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    classifiers: BTreeMap<Category, LinearClassifier>,
}

/// Raw wire shape; promoted to `TrainedModel` only after validation.
#[derive(Deserialize)]
struct ModelData {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    classifiers: BTreeMap<Category, LinearClassifier>,
}

impl TryFrom<ModelData> for TrainedModel {
    type Error = ModelError;

    fn try_from(data: ModelData) -> ModelResult<Self> {
        Self::new(data.vocabulary, data.idf, data.classifiers)
    }
}

impl TrainedModel {
    pub fn new(
        vocabulary: HashMap<String, usize>,
        idf: Vec<f64>,
        classifiers: BTreeMap<Category, LinearClassifier>,
    ) -> ModelResult<Self> {
        let model = Self {
            vocabulary,
            idf,
            classifiers,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn load(path: impl AsRef<Path>) -> ModelResult<Self> {
        let data = std::fs::read(path)?;
        let model: Self = serde_json::from_slice(&data)?;
        Ok(model)
    }

    fn validate(&self) -> ModelResult<()> {
        let dim = self.vocabulary.len();

        if self.idf.len() != dim {
            return Err(ModelError::Invalid(format!(
                "idf length {} does not match vocabulary size {dim}",
                self.idf.len()
            )));
        }

        for (index, value) in self.idf.iter().enumerate() {
            if !value.is_finite() || *value < 0.0 {
                return Err(ModelError::Invalid(format!(
                    "idf weight at index {index} is {value}; must be finite and non-negative"
                )));
            }
        }

        let mut seen = vec![false; dim];
        for (term, &index) in &self.vocabulary {
            if index >= dim {
                return Err(ModelError::Invalid(format!(
                    "term {term:?} maps to index {index}, outside 0..{dim}"
                )));
            }
            if seen[index] {
                return Err(ModelError::Invalid(format!(
                    "vocabulary index {index} is assigned to more than one term"
                )));
            }
            seen[index] = true;
        }

        if self.classifiers.is_empty() {
            return Err(ModelError::Invalid(
                "model carries no category classifiers".to_string(),
            ));
        }

        for (category, classifier) in &self.classifiers {
            if classifier.weights.len() != dim {
                return Err(ModelError::Invalid(format!(
                    "classifier for {category} has {} weights, expected {dim}",
                    classifier.weights.len()
                )));
            }
            if !classifier.bias.is_finite()
                || classifier.weights.iter().any(|w| !w.is_finite())
            {
                return Err(ModelError::Invalid(format!(
                    "classifier for {category} contains non-finite values"
                )));
            }
        }

        Ok(())
    }

    /// Number of feature dimensions, equal to the vocabulary size.
    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf_weight(&self, index: usize) -> f64 {
        self.idf.get(index).copied().unwrap_or(0.0)
    }

    pub fn classifiers(&self) -> impl Iterator<Item = (Category, &LinearClassifier)> {
        self.classifiers.iter().map(|(&category, clf)| (category, clf))
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.classifiers.keys().copied()
    }

    pub fn category_count(&self) -> usize {
        self.classifiers.len()
    }
}

#[cfg(test)]
impl TrainedModel {
    /// Small hand-built model used across unit tests: one indicator term
    /// per category, idf 1.0 everywhere, zero biases.
    pub(crate) fn fixture() -> Self {
        let terms = ["contract", "invoice", "court", "report", "skills"];
        let vocabulary: HashMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(index, term)| ((*term).to_string(), index))
            .collect();

        let one_hot = |index: usize| {
            let mut weights = vec![0.0; terms.len()];
            weights[index] = 1.0;
            LinearClassifier { weights, bias: 0.0 }
        };

        let classifiers = BTreeMap::from([
            (Category::Contract, one_hot(0)),
            (Category::Invoice, one_hot(1)),
            (Category::LegalDoc, one_hot(2)),
            (Category::Report, one_hot(3)),
            (Category::Resume, one_hot(4)),
        ]);

        Self::new(vocabulary, vec![1.0; terms.len()], classifiers).unwrap()
    }
}
