use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use doctriage_core::PipelineOutput;
use serde::Deserialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(analyze_text))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

/// Runs the pipeline over already-recovered text, skipping upload and
/// format decoding.
async fn analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Json<PipelineOutput> {
    Json(state.pipeline.process(&request.text))
}
