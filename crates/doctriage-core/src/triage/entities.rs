use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Shared pattern sources; the resume extractor reuses the contact shapes.
pub(crate) const EMAIL_PATTERN: &str =
    r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b";
pub(crate) const PHONE_US_PATTERN: &str =
    r"(?:\+?1[-.\s]?)?(?:\(\d{3}\)|\d{3})[-.\s]?\d{3}[-.\s]?\d{4}\b";
pub(crate) const PHONE_INTL_PATTERN: &str = r"\+(?:\d ?){6,14}\d";

/// Cross-category entities present in any kind of document, found by a
/// scan that is independent of the predicted category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntities {
    pub dates: Vec<String>,
    pub amounts: Vec<String>,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
}

impl DocumentEntities {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
            && self.amounts.is_empty()
            && self.emails.is_empty()
            && self.phones.is_empty()
    }
}

/// Compiled entity patterns, built once and reused across requests.
pub struct EntityScanner {
    email: Regex,
    phones: Vec<Regex>,
    amounts: Vec<Regex>,
    dates: Vec<Regex>,
}

impl EntityScanner {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            email: Regex::new(EMAIL_PATTERN)?,
            phones: vec![
                Regex::new(PHONE_US_PATTERN)?,
                Regex::new(PHONE_INTL_PATTERN)?,
            ],
            amounts: vec![
                Regex::new(r"[$€£]\s?\d{1,3}(?:,\d{3})*(?:\.\d{2})?")?,
                Regex::new(r"\b\d{1,3}(?:,\d{3})+\.\d{2}\b")?,
            ],
            dates: vec![
                Regex::new(r"\b\d{1,2}/\d{1,2}/\d{2,4}\b")?,
                Regex::new(r"\b\d{1,2}-\d{1,2}-\d{2,4}\b")?,
                Regex::new(r"\b\d{4}-\d{2}-\d{2}\b")?,
                Regex::new(
                    r"(?i)\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\s+\d{1,2},?\s+\d{4}\b",
                )?,
            ],
        })
    }

    /// Runs every pattern over the raw text, preserving original casing
    /// and formatting. Matches are reported in document order with exact
    /// duplicates removed.
    #[must_use]
    pub fn scan(&self, text: &str) -> DocumentEntities {
        DocumentEntities {
            dates: collect_in_order(&self.dates, text),
            amounts: collect_in_order(&self.amounts, text),
            emails: collect_in_order(std::slice::from_ref(&self.email), text),
            phones: collect_in_order(&self.phones, text),
        }
    }
}

fn collect_in_order(patterns: &[Regex], text: &str) -> Vec<String> {
    let mut hits: Vec<(usize, usize, String)> = Vec::new();
    for pattern in patterns {
        for found in pattern.find_iter(text) {
            hits.push((found.start(), found.end(), found.as_str().to_string()));
        }
    }
    // Earliest start first; on equal starts prefer the longest match, so a
    // shorter hit nested inside another pattern's span is dropped below.
    hits.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

    let mut seen = HashSet::new();
    let mut values = Vec::new();
    let mut covered_end = 0;
    for (start, end, value) in hits {
        if start < covered_end {
            continue;
        }
        covered_end = end;
        if seen.insert(value.clone()) {
            values.push(value);
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> EntityScanner {
        EntityScanner::new().unwrap()
    }

    #[test]
    fn test_scan_mixed_document() {
        let text = "Invoice dated 01/15/2024.\n\
                    Contact billing@acme.com or (555) 123-4567.\n\
                    Total: $450.00, deposit $1,200.00 received March 3, 2024.";

        let entities = scanner().scan(text);

        assert_eq!(entities.dates, vec!["01/15/2024", "March 3, 2024"]);
        assert_eq!(entities.amounts, vec!["$450.00", "$1,200.00"]);
        assert_eq!(entities.emails, vec!["billing@acme.com"]);
        assert_eq!(entities.phones, vec!["(555) 123-4567"]);
    }

    #[test]
    fn test_duplicates_removed_in_document_order() {
        let text = "$450.00 then $99.00 then $450.00 again";
        let entities = scanner().scan(text);

        assert_eq!(entities.amounts, vec!["$450.00", "$99.00"]);
    }

    #[test]
    fn test_iso_and_dash_dates() {
        let entities = scanner().scan("signed 2024-01-15, archived 3-4-24");
        assert_eq!(entities.dates, vec!["2024-01-15", "3-4-24"]);
    }

    #[test]
    fn test_original_casing_preserved() {
        let entities = scanner().scan("due JANUARY 5, 2020");
        assert_eq!(entities.dates, vec!["JANUARY 5, 2020"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(scanner().scan("").is_empty());
    }
}
