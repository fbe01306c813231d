use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::validation::FieldError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Body is not JSON at all.
    #[error("malformed JSON body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("{} invalid field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match self {
            ServiceError::MalformedBody(e) => {
                (StatusCode::BAD_REQUEST, format!("malformed JSON body: {e}")).into_response()
            }
            ServiceError::Validation(detail) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": detail }))).into_response()
            }
            ServiceError::Internal(msg) => {
                error!(%msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
