mod classifier;
mod entities;
mod extract;
mod normalizer;
mod pipeline;
mod vectorizer;

pub use classifier::{classify, score_all, ClassificationResult};
pub use entities::{DocumentEntities, EntityScanner};
pub use extract::{
    ContractExtractor, ExtractError, ExtractResult, ExtractedFields, ExtractorRegistry,
    FieldExtractor, FieldValue, InvoiceExtractor, LegalDocExtractor, LineItem, ResumeExtractor,
};
pub use normalizer::{normalize, NormalizedText};
pub use pipeline::{PipelineError, PipelineOutput, PipelineResult, TriagePipeline};
pub use vectorizer::{vectorize, FeatureVector};
