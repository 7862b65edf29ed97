use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use doctriage_core::{
    Category, CompositeRecovery, TesseractEngine, TrainedModel, TriagePipeline,
};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::ServerConfig;

/// Unique identifier for an uploaded document
pub type DocumentId = Uuid;

/// Index entry for one stored upload
#[derive(Debug, Clone, Serialize)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub filename: String,
    pub mime_type: Option<String>,
    pub category: Category,
    pub confidence: f64,
    pub uploaded_at: DateTime<Utc>,
}

/// Process-wide state shared by every request.
///
/// The trained model and pipeline are built exactly once here and never
/// mutated afterwards; picking up a retrained model means restarting the
/// process. Only the upload index is mutable, behind an async lock.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<TriagePipeline>,
    pub recovery: Arc<CompositeRecovery>,
    pub documents: Arc<RwLock<HashMap<DocumentId, StoredDocument>>>,
    pub upload_dir: PathBuf,
}

impl AppState {
    pub async fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        let model = TrainedModel::load(&config.model_path)?;
        tracing::info!(
            path = %config.model_path,
            terms = model.dimension(),
            categories = model.category_count(),
            "loaded trained model"
        );

        let pipeline = TriagePipeline::new(Arc::new(model))?;

        let mut engine = TesseractEngine::new();
        if let Some(path) = &config.tesseract_path {
            engine = engine.with_binary(PathBuf::from(path));
        }
        let recovery = CompositeRecovery::with_default_recoverers(Box::new(engine));

        let upload_dir = PathBuf::from(&config.upload_dir);
        tokio::fs::create_dir_all(&upload_dir).await?;

        Ok(Self {
            pipeline: Arc::new(pipeline),
            recovery: Arc::new(recovery),
            documents: Arc::new(RwLock::new(HashMap::new())),
            upload_dir,
        })
    }
}
