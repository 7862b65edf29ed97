/// Token sequence produced by [`normalize`]; request-scoped and consumed
/// by the vectorizer.
pub type NormalizedText = Vec<String>;

/// Punctuation retained inside tokens so amount, date, id, and email
/// shapes survive tokenization ("$450.00", "inv-1001", "a@b.com").
const KEPT_PUNCTUATION: &[char] = &['$', '€', '£', '#', '/', '-', '.', '@', '%'];

/// Separator-like punctuation stripped from token edges ("total:" keeps
/// the colon out already; "inc." becomes "inc", "#inv-1001" becomes
/// "inv-1001").
const EDGE_PUNCTUATION: &[char] = &['#', '/', '-', '.', '%'];

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || KEPT_PUNCTUATION.contains(&c)
}

/// Lower-cases raw text and splits it into terms.
///
/// Pure and deterministic: the same input always yields the same token
/// sequence, and empty input yields an empty sequence.
#[must_use]
pub fn normalize(raw: &str) -> NormalizedText {
    raw.to_lowercase()
        .split(|c: char| !is_token_char(c))
        .filter_map(|token| {
            let trimmed = token.trim_matches(|c: char| EDGE_PUNCTUATION.contains(&c));
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}
