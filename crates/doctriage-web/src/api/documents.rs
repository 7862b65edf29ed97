use axum::extract::{Multipart, Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use doctriage_core::{DocumentFormat, PipelineOutput};
use serde::Serialize;
use uuid::Uuid;

use crate::state::{AppState, DocumentId, StoredDocument};

use super::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(upload_document).get(list_documents))
        .route("/{id}", get(get_document))
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: DocumentId,
    pub filename: String,
    #[serde(flatten)]
    pub result: PipelineOutput,
}

/// Mime type is authoritative; the filename extension is the fallback for
/// generic types like application/octet-stream.
fn resolve_format(mime: Option<&str>, filename: &str) -> Option<DocumentFormat> {
    mime.and_then(DocumentFormat::from_mime).or_else(|| {
        std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(DocumentFormat::from_extension)
    })
}

async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map_or_else(|| "upload".to_string(), ToString::to_string);
        let mime_type = field.content_type().map(ToString::to_string);
        let data = field.bytes().await?;

        let format = resolve_format(mime_type.as_deref(), &filename).ok_or_else(|| {
            ApiError::UnknownFormat(mime_type.clone().unwrap_or_else(|| filename.clone()))
        })?;

        let text = state.recovery.recover_bytes(&data, format).await?;
        let result = state.pipeline.process(&text);

        let id = Uuid::new_v4();
        tokio::fs::write(state.upload_dir.join(id.to_string()), &data).await?;

        let stored = StoredDocument {
            id,
            filename: filename.clone(),
            mime_type,
            category: result.classification.category,
            confidence: result.classification.confidence,
            uploaded_at: Utc::now(),
        };
        state.documents.write().await.insert(id, stored);

        tracing::info!(
            %id,
            filename = %filename,
            category = %result.classification.category,
            "processed upload"
        );

        return Ok(Json(UploadResponse {
            id,
            filename,
            result,
        }));
    }

    Err(ApiError::MissingFile)
}

async fn list_documents(State(state): State<AppState>) -> Json<Vec<StoredDocument>> {
    let mut documents: Vec<StoredDocument> =
        state.documents.read().await.values().cloned().collect();
    documents.sort_by_key(|document| document.uploaded_at);
    Json(documents)
}

async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StoredDocument>, ApiError> {
    state
        .documents
        .read()
        .await
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_format_prefers_mime() {
        assert_eq!(
            resolve_format(Some("application/pdf"), "scan.txt"),
            Some(DocumentFormat::Pdf)
        );
    }

    #[test]
    fn test_resolve_format_falls_back_to_extension() {
        assert_eq!(
            resolve_format(Some("application/octet-stream"), "notes.txt"),
            Some(DocumentFormat::PlainText)
        );
        assert_eq!(resolve_format(None, "photo.JPG"), Some(DocumentFormat::Jpeg));
    }

    #[test]
    fn test_resolve_format_unknown() {
        assert_eq!(resolve_format(Some("video/mp4"), "clip.mp4"), None);
        assert_eq!(resolve_format(None, "no_extension"), None);
    }
}
