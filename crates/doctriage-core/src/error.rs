use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Model error: {0}")]
    Model(#[from] crate::model::ModelError),

    #[error("Recovery error: {0}")]
    Recovery(#[from] crate::recover::RecoveryError),

    #[error("OCR error: {0}")]
    Ocr(#[from] crate::ocr::OcrError),

    #[error("Extraction error: {0}")]
    Extract(#[from] crate::triage::ExtractError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] crate::triage::PipelineError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
