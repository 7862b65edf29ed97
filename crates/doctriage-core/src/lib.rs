pub mod category;
pub mod error;
pub mod model;
pub mod ocr;
pub mod recover;
pub mod triage;

pub use category::Category;
pub use error::{Error, Result};
pub use model::{LinearClassifier, ModelError, ModelResult, TrainedModel};
pub use ocr::{OcrEngine, OcrError, OcrResult, TesseractEngine};
pub use recover::{
    CompositeRecovery, DocumentFormat, DocxRecovery, PdfRecovery, PlainTextRecovery,
    RecoveryError, RecoveryResult, TextRecovery,
};
pub use triage::{
    classify, normalize, score_all, vectorize, ClassificationResult, DocumentEntities,
    EntityScanner, ExtractError, ExtractResult, ExtractedFields, ExtractorRegistry,
    FeatureVector, FieldExtractor, FieldValue, LineItem, NormalizedText, PipelineError,
    PipelineOutput, PipelineResult, TriagePipeline,
};
