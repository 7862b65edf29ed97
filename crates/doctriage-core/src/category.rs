use serde::{Deserialize, Serialize};

/// Document categories the trained model can assign.
///
/// Variants are declared in lexicographic order of their wire names;
/// ordered-map iteration over categories relies on this for deterministic
/// tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Contract,
    Invoice,
    LegalDoc,
    Report,
    Resume,
}

impl Category {
    pub const ALL: [Self; 5] = [
        Self::Contract,
        Self::Invoice,
        Self::LegalDoc,
        Self::Report,
        Self::Resume,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contract => "contract",
            Self::Invoice => "invoice",
            Self::LegalDoc => "legal_doc",
            Self::Report => "report",
            Self::Resume => "resume",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contract" => Ok(Self::Contract),
            "invoice" => Ok(Self::Invoice),
            "legal_doc" => Ok(Self::LegalDoc),
            "report" => Ok(Self::Report),
            "resume" => Ok(Self::Resume),
            other => Err(crate::Error::InvalidCategory(other.to_string())),
        }
    }
}
