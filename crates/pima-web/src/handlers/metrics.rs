use axum::{extract::State, Json};
use pima_common::MetricsDocument;

use crate::state::SharedState;

/// GET /metrics - the evaluation document loaded at startup.
pub async fn metrics(State(state): State<SharedState>) -> Json<MetricsDocument> {
    Json(state.metrics.clone())
}
