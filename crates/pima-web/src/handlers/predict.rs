//! `POST /predict`: validate the patient record and run the model.

use axum::{body::Bytes, extract::State, Json};
use pima_common::PredictionResponse;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ServiceError;
use crate::state::SharedState;
use crate::validation::validate_patient;

pub async fn predict(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<PredictionResponse>, ServiceError> {
    let value: Value = serde_json::from_slice(&body)?;
    let features = validate_patient(&value).map_err(|errors| {
        debug!(errors = errors.len(), "Rejected prediction request");
        ServiceError::Validation(errors)
    })?;

    let model = state.model.clone();
    let inference = tokio::task::spawn_blocking(move || model.predict(&features))
        .await
        .map_err(|e| ServiceError::Internal(format!("inference task failed: {e}")))?;

    info!(class = inference.class, confidence = inference.confidence, "Prediction served");
    Ok(Json(PredictionResponse::for_class(inference.class, inference.confidence)))
}
