use regex::Regex;

use crate::category::Category;

use super::{
    all_matches, dedup_in_order, insert_list, insert_text, ExtractedFields, FieldExtractor,
};

/// Legal document kinds recognized by keyword, checked in declaration
/// order; the first matching kind wins.
const DOCUMENT_TYPES: &[(&str, &str)] = &[
    ("contract", r"(?i)\b(?:contract|agreement|terms)\b"),
    ("lawsuit", r"(?i)\b(?:lawsuit|complaint|motion|plaintiff|defendant)\b"),
    ("will", r"(?i)\b(?:testament|estate)\b"),
    ("patent", r"(?i)\b(?:patent|invention|intellectual)\b"),
    ("license", r"(?i)\b(?:license|permit|authorization)\b"),
];

pub struct LegalDocExtractor {
    case_number: Regex,
    court_name: Regex,
    party_label: Regex,
    versus: Regex,
    types: Vec<(&'static str, Regex)>,
}

impl LegalDocExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        let types = DOCUMENT_TYPES
            .iter()
            .map(|(name, pattern)| Ok((*name, Regex::new(pattern)?)))
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self {
            case_number: Regex::new(
                r"(?i)\b(?:case|docket|file)\s+(?:no\.?|number)?\s*[:#]?\s*([A-Za-z0-9][A-Za-z0-9-]*)",
            )?,
            // Case-sensitive on purpose: court names are proper nouns.
            court_name: Regex::new(
                r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\s+(?:Court|District|Circuit|Supreme)\b[^\n]*)",
            )?,
            party_label: Regex::new(
                r"(?im)^\s*(?:plaintiff|defendant|petitioner|respondent)s?\s*[:\-]\s*(.+)$",
            )?,
            versus: Regex::new(r"\b([A-Z][A-Za-z.,&' ]{2,40}?)\s+vs?\.\s+([A-Z][A-Za-z.,&' ]{2,40})")?,
            types,
        })
    }

    fn case_numbers(&self, text: &str) -> Vec<String> {
        all_matches(&self.case_number, text)
            .into_iter()
            .filter(|value| value.chars().any(|c| c.is_ascii_digit()))
            .collect()
    }

    fn parties(&self, text: &str) -> Vec<String> {
        let mut parties = Vec::new();

        if let Some(cap) = self.versus.captures(text) {
            for group in [1, 2] {
                if let Some(party) = cap.get(group) {
                    let value = party.as_str().trim().trim_end_matches(['.', ',']);
                    if !value.is_empty() {
                        parties.push(value.to_string());
                    }
                }
            }
        }

        parties.extend(all_matches(&self.party_label, text));
        dedup_in_order(parties)
    }

    fn document_type(&self, text: &str) -> Option<String> {
        self.types
            .iter()
            .find(|(_, pattern)| pattern.is_match(text))
            .map(|(name, _)| (*name).to_string())
    }
}

impl FieldExtractor for LegalDocExtractor {
    fn category(&self) -> Category {
        Category::LegalDoc
    }

    fn fields(&self) -> &'static [&'static str] {
        &["case_numbers", "court_names", "parties", "document_type"]
    }

    fn extract(&self, text: &str) -> ExtractedFields {
        let mut fields = ExtractedFields::new();

        insert_list(&mut fields, "case_numbers", self.case_numbers(text));
        insert_list(&mut fields, "court_names", all_matches(&self.court_name, text));
        insert_list(&mut fields, "parties", self.parties(text));
        insert_text(&mut fields, "document_type", self.document_type(text));

        fields
    }
}
