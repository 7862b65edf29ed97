mod contract;
mod invoice;
mod legal;
mod resume;

pub use contract::ContractExtractor;
pub use invoice::InvoiceExtractor;
pub use legal::LegalDocExtractor;
pub use resume::ResumeExtractor;

use std::collections::{BTreeMap, HashSet};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::category::Category;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("No extractor registered for category: {0}")]
    UnknownCategory(Category),
}

pub type ExtractResult<T> = Result<T, ExtractError>;

/// One invoice table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub amount: String,
}

/// Value of a single extracted field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Items(Vec<LineItem>),
}

/// Category-specific structured output: field name -> extracted value.
///
/// A field that was not found is simply absent, never an empty-string
/// placeholder, so callers can tell "found empty" from "not found".
pub type ExtractedFields = BTreeMap<String, FieldValue>;

/// Rule-based field recovery for one document category.
///
/// Implementations run over the raw (not normalized) text so extracted
/// values keep their original casing and formatting, and they never fail:
/// a field whose rules do not match is left out of the result.
pub trait FieldExtractor: Send + Sync {
    fn category(&self) -> Category;

    /// Ordered names of every field this extractor can produce; the
    /// category's schema. Extraction output keys are always a subset.
    fn fields(&self) -> &'static [&'static str];

    fn extract(&self, text: &str) -> ExtractedFields;
}

/// Maps a predicted category to its field extractor.
pub struct ExtractorRegistry {
    extractors: BTreeMap<Category, Box<dyn FieldExtractor>>,
}

impl ExtractorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractors: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: Box<dyn FieldExtractor>) -> Self {
        self.extractors.insert(extractor.category(), extractor);
        self
    }

    /// Registry covering every category with a defined schema. The
    /// `report` category intentionally has none, so reports exercise the
    /// unknown-category path.
    pub fn with_default_extractors() -> Result<Self, regex::Error> {
        Ok(Self::new()
            .with_extractor(Box::new(ContractExtractor::new()?))
            .with_extractor(Box::new(InvoiceExtractor::new()?))
            .with_extractor(Box::new(LegalDocExtractor::new()?))
            .with_extractor(Box::new(ResumeExtractor::new()?)))
    }

    pub fn is_registered(&self, category: Category) -> bool {
        self.extractors.contains_key(&category)
    }

    pub fn extract(&self, category: Category, text: &str) -> ExtractResult<ExtractedFields> {
        self.extractors
            .get(&category)
            .map(|extractor| extractor.extract(text))
            .ok_or(ExtractError::UnknownCategory(category))
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Shared rule helpers. Scalar fields take the first occurrence in document
// order; list fields collect every occurrence in document order with exact
// duplicates removed.

fn capture_text(cap: &regex::Captures<'_>) -> Option<String> {
    cap.get(1)
        .or_else(|| cap.get(0))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(crate) fn first_match(pattern: &Regex, text: &str) -> Option<String> {
    pattern.captures(text).and_then(|cap| capture_text(&cap))
}

/// First capture that carries at least one digit; keeps labeled id fields
/// ("Invoice # ...") from swallowing ordinary words.
pub(crate) fn first_match_with_digit(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures_iter(text)
        .filter_map(|cap| capture_text(&cap))
        .find(|value| value.chars().any(|c| c.is_ascii_digit()))
}

pub(crate) fn all_matches(pattern: &Regex, text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut values: Vec<String> = pattern
        .captures_iter(text)
        .filter_map(|cap| capture_text(&cap))
        .collect();
    values.retain(|value| seen.insert(value.clone()));
    values
}

pub(crate) fn dedup_in_order(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut values = values;
    values.retain(|value| seen.insert(value.clone()));
    values
}

pub(crate) fn insert_text(fields: &mut ExtractedFields, name: &str, value: Option<String>) {
    if let Some(value) = value {
        fields.insert(name.to_string(), FieldValue::Text(value));
    }
}

pub(crate) fn insert_list(fields: &mut ExtractedFields, name: &str, values: Vec<String>) {
    if !values.is_empty() {
        fields.insert(name.to_string(), FieldValue::List(values));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_category_error() {
        let registry = ExtractorRegistry::with_default_extractors().unwrap();

        let result = registry.extract(Category::Report, "Quarterly report, 15% growth.");

        assert!(matches!(
            result,
            Err(ExtractError::UnknownCategory(Category::Report))
        ));
    }

    #[test]
    fn test_registered_categories() {
        let registry = ExtractorRegistry::with_default_extractors().unwrap();

        for category in [
            Category::Contract,
            Category::Invoice,
            Category::LegalDoc,
            Category::Resume,
        ] {
            assert!(registry.is_registered(category));
        }
        assert!(!registry.is_registered(Category::Report));
    }

    #[test]
    fn test_output_keys_stay_within_schema() {
        let samples = [
            (
                Category::Invoice,
                "INVOICE #INV-1001\nBill To: Acme Corp\nDate: 01/15/2024\nTotal: $450.00\nNet 30",
            ),
            (
                Category::Contract,
                "Agreement between Acme Corp and Beta LLC, effective January 1, 2025.",
            ),
            (
                Category::Resume,
                "Jordan Blake\njordan@mail.com\nSkills: Python, SQL\n5 years of experience",
            ),
            (
                Category::LegalDoc,
                "Case No. 12-CV-9 in the Superior Court of Ohio. Plaintiff: A. Defendant: B.",
            ),
        ];

        for (category, text) in samples {
            let extractor: Box<dyn FieldExtractor> = match category {
                Category::Invoice => Box::new(InvoiceExtractor::new().unwrap()),
                Category::Contract => Box::new(ContractExtractor::new().unwrap()),
                Category::LegalDoc => Box::new(LegalDocExtractor::new().unwrap()),
                Category::Resume => Box::new(ResumeExtractor::new().unwrap()),
                Category::Report => unreachable!(),
            };

            let fields = extractor.extract(text);
            assert!(!fields.is_empty());
            for key in fields.keys() {
                assert!(
                    extractor.fields().contains(&key.as_str()),
                    "{category}: field {key} missing from schema"
                );
            }
        }
    }

    #[test]
    fn test_registered_extraction_never_fails() {
        let registry = ExtractorRegistry::with_default_extractors().unwrap();

        for category in Category::ALL {
            if registry.is_registered(category) {
                assert!(registry.extract(category, "").is_ok());
                assert!(registry.extract(category, "no recognizable fields").is_ok());
            }
        }
    }

    #[test]
    fn test_first_match_with_digit_skips_words() {
        let pattern = Regex::new(r"(?i)\binvoice\s*#?\s*([A-Za-z0-9/-]+)").unwrap();

        let value = first_match_with_digit(&pattern, "");
        assert!(value.is_none());

        let value = first_match_with_digit(&pattern, "invoice for services, invoice INV-7");
        assert_eq!(value.as_deref(), Some("INV-7"));
    }
}
