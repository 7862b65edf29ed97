use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use doctriage_core::Category;
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub categories: Vec<Category>,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        categories: state.pipeline.model().categories().collect(),
    })
}
