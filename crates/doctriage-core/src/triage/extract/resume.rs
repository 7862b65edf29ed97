use regex::Regex;

use crate::category::Category;
use crate::triage::entities::{EMAIL_PATTERN, PHONE_INTL_PATTERN, PHONE_US_PATTERN};

use super::{all_matches, first_match, insert_list, insert_text, ExtractedFields, FieldExtractor};

/// Known skills matched by containment, with canonical casing restored in
/// the output. Matched in document order.
const SKILLS: &[&str] = &[
    "Python",
    "Java",
    "JavaScript",
    "TypeScript",
    "Rust",
    "SQL",
    "HTML",
    "CSS",
    "React",
    "Node.js",
    "Machine Learning",
    "Data Analysis",
    "Project Management",
    "Communication",
    "Leadership",
    "Problem Solving",
    "Teamwork",
    "Microsoft Office",
];

/// Bare section headers that can precede the candidate's name.
const HEADER_LINES: &[&str] = &["resume", "curriculum vitae", "cv"];

pub struct ResumeExtractor {
    email: Regex,
    phone_us: Regex,
    phone_intl: Regex,
    education: Regex,
    experience_years: Regex,
}

impl ResumeExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            email: Regex::new(EMAIL_PATTERN)?,
            phone_us: Regex::new(PHONE_US_PATTERN)?,
            phone_intl: Regex::new(PHONE_INTL_PATTERN)?,
            education: Regex::new(
                r"(?i)\b(?:bachelor|master|ph\.?d\.?|b\.s\.|m\.s\.|m\.a\.|b\.a\.|mba)[^\n]*",
            )?,
            experience_years: Regex::new(
                r"(?i)\b(\d+)\s*\+?\s*years?(?:\s+of\s+experience)?\b",
            )?,
        })
    }

    /// First plausible line: no field separators, no email, at least one
    /// letter. Resumes lead with the candidate's name.
    fn candidate_name(text: &str) -> Option<String> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .find(|line| {
                !line.contains([':', '|', '@'])
                    && line.chars().any(char::is_alphabetic)
                    && !HEADER_LINES.contains(&line.to_lowercase().as_str())
            })
            .map(String::from)
    }

    fn skills(text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut found: Vec<(usize, &str)> = SKILLS
            .iter()
            .filter_map(|skill| {
                find_word(&lowered, &skill.to_lowercase()).map(|position| (position, *skill))
            })
            .collect();
        found.sort_by_key(|(position, _)| *position);
        found.into_iter().map(|(_, skill)| skill.to_string()).collect()
    }

    fn phone(&self, text: &str) -> Option<String> {
        first_match(&self.phone_us, text).or_else(|| first_match(&self.phone_intl, text))
    }
}

/// Substring search that only accepts hits on word boundaries, so "Java"
/// does not fire inside "JavaScript".
fn find_word(haystack: &str, needle: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(relative) = haystack[from..].find(needle) {
        let start = from + relative;
        let end = start + needle.len();
        let before_ok = start == 0 || !haystack.as_bytes()[start - 1].is_ascii_alphanumeric();
        let after_ok =
            end == haystack.len() || !haystack.as_bytes()[end].is_ascii_alphanumeric();
        if before_ok && after_ok {
            return Some(start);
        }
        from = start + 1;
    }
    None
}

impl FieldExtractor for ResumeExtractor {
    fn category(&self) -> Category {
        Category::Resume
    }

    fn fields(&self) -> &'static [&'static str] {
        &[
            "candidate_name",
            "email",
            "phone",
            "skills",
            "education",
            "experience_years",
        ]
    }

    fn extract(&self, text: &str) -> ExtractedFields {
        let mut fields = ExtractedFields::new();

        insert_text(&mut fields, "candidate_name", Self::candidate_name(text));
        insert_text(&mut fields, "email", first_match(&self.email, text));
        insert_text(&mut fields, "phone", self.phone(text));
        insert_list(&mut fields, "skills", Self::skills(text));
        insert_list(&mut fields, "education", all_matches(&self.education, text));
        insert_text(
            &mut fields,
            "experience_years",
            first_match(&self.experience_years, text),
        );

        fields
    }
}
