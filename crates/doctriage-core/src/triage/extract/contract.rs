use regex::Regex;

use crate::category::Category;

use super::{
    all_matches, dedup_in_order, first_match, insert_list, insert_text, ExtractedFields,
    FieldExtractor,
};

/// Contract kinds recognized by keyword, checked in declaration order;
/// the first matching kind wins.
const CONTRACT_TYPES: &[(&str, &str)] = &[
    ("employment", r"(?i)\b(?:employment|job|position|salary)\b"),
    ("service", r"(?i)\b(?:service|services|consulting|agreement)\b"),
    ("purchase", r"(?i)\b(?:purchase|buy|sale|vendor)\b"),
    ("lease", r"(?i)\b(?:lease|rent|rental|tenant)\b"),
    ("license", r"(?i)\b(?:license|licensing|intellectual)\b"),
];

pub struct ContractExtractor {
    between: Regex,
    party_label: Regex,
    effective_date: Regex,
    expiration_date: Regex,
    value: Regex,
    payment_terms: Regex,
    types: Vec<(&'static str, Regex)>,
}

impl ContractExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        const DATE: &str =
            r"[A-Za-z]+\s+\d{1,2},?\s+\d{4}|\d{1,2}[/-]\d{1,2}[/-]\d{2,4}|\d{4}-\d{2}-\d{2}";

        let types = CONTRACT_TYPES
            .iter()
            .map(|(name, pattern)| Ok((*name, Regex::new(pattern)?)))
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self {
            between: Regex::new(
                r"(?i)\bbetween\s+(.{2,60}?)\s+and\s+(.{2,60}?)(?:[,.;\n]|\s+on\b|\s+dated\b|\s+effective\b|$)",
            )?,
            party_label: Regex::new(r"(?im)^\s*part(?:y|ies)\s*(?:\([^)]*\))?\s*[:\-]\s*(.+)$")?,
            effective_date: Regex::new(&format!(
                r"(?i)\beffective\s*(?:as\s+of|date|from|on)?\s*[:\-]?\s*({DATE})"
            ))?,
            expiration_date: Regex::new(&format!(
                r"(?i)\bexpir\w*\s*(?:date|on)?\s*[:\-]?\s*({DATE})"
            ))?,
            value: Regex::new(
                r"(?i)\b(?:contract\s+value|total\s+value|valued\s+at|worth|amount\s+due|total|amount)\s*[:\-]?\s*([$€£]\s?\d{1,3}(?:,\d{3})*(?:\.\d{2})?)",
            )?,
            payment_terms: Regex::new(
                r"(?i)\b(?:net\s+\d+|within\s+\d+\s+days|payment\s+due\s+in\s+\d+\s+days)",
            )?,
            types,
        })
    }

    fn parties(&self, text: &str) -> Vec<String> {
        let mut parties = Vec::new();

        if let Some(cap) = self.between.captures(text) {
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

    fn contract_type(&self, text: &str) -> Option<String> {
        self.types
            .iter()
            .find(|(_, pattern)| pattern.is_match(text))
            .map(|(name, _)| (*name).to_string())
    }
}

impl FieldExtractor for ContractExtractor {
    fn category(&self) -> Category {
        Category::Contract
    }

    fn fields(&self) -> &'static [&'static str] {
        &[
            "parties",
            "effective_date",
            "expiration_date",
            "contract_value",
            "payment_terms",
            "contract_type",
        ]
    }

    fn extract(&self, text: &str) -> ExtractedFields {
        let mut fields = ExtractedFields::new();

        insert_list(&mut fields, "parties", self.parties(text));
        insert_text(
            &mut fields,
            "effective_date",
            first_match(&self.effective_date, text),
        );
        insert_text(
            &mut fields,
            "expiration_date",
            first_match(&self.expiration_date, text),
        );
        insert_text(&mut fields, "contract_value", first_match(&self.value, text));
        insert_text(
            &mut fields,
            "payment_terms",
            first_match(&self.payment_terms, text),
        );
        insert_text(&mut fields, "contract_type", self.contract_type(text));

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triage::extract::FieldValue;

    fn extractor() -> ContractExtractor {
        ContractExtractor::new().unwrap()
    }

    fn text_field<'a>(fields: &'a ExtractedFields, name: &str) -> Option<&'a str> {
        match fields.get(name) {
            Some(FieldValue::Text(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    #[test]
    fn test_consulting_contract() {
        let text = "This consulting agreement is made between Acme Corp and Beta LLC, \
                    effective January 1, 2025.\n\
                    Total Value: $50,000.00\n\
                    Payment terms: Net 30. The agreement expires on December 31, 2026.";

        let fields = extractor().extract(text);

        match fields.get("parties") {
            Some(FieldValue::List(parties)) => {
                assert_eq!(parties, &["Acme Corp", "Beta LLC"]);
            }
            other => panic!("expected parties list, got {other:?}"),
        }
        assert_eq!(text_field(&fields, "effective_date"), Some("January 1, 2025"));
        assert_eq!(
            text_field(&fields, "expiration_date"),
            Some("December 31, 2026")
        );
        assert_eq!(text_field(&fields, "contract_value"), Some("$50,000.00"));
        assert_eq!(text_field(&fields, "payment_terms"), Some("Net 30"));
        assert_eq!(text_field(&fields, "contract_type"), Some("service"));
    }

    #[test]
    fn test_party_labels_and_employment_type() {
        let text = "EMPLOYMENT AGREEMENT\n\
                    Party: Northwind Industries\n\
                    Party: Dana Rivera\n\
                    Position: Senior Engineer, salary reviewed annually.";

        let fields = extractor().extract(text);

        match fields.get("parties") {
            Some(FieldValue::List(parties)) => {
                assert_eq!(parties, &["Northwind Industries", "Dana Rivera"]);
            }
            other => panic!("expected parties list, got {other:?}"),
        }
        assert_eq!(text_field(&fields, "contract_type"), Some("employment"));
    }

    #[test]
    fn test_empty_text_yields_no_fields() {
        assert!(extractor().extract("").is_empty());
    }
}
