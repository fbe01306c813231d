//! Shared application state for the prediction service.

use std::sync::Arc;

use pima_common::{MetricsDocument, PimaError, Result};
use pima_config::ServerConfig;
use tracing::info;

use crate::model::LogisticModel;

/// Shared state injected into every Axum handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub model: Arc<LogisticModel>,
    /// Evaluation metrics, served verbatim.
    pub metrics: MetricsDocument,
}

impl AppState {
    pub fn new(model: LogisticModel, metrics: MetricsDocument) -> Self {
        Self { model: Arc::new(model), metrics }
    }

    /// Load the model bundle and metrics document named in the config.
    pub fn load(config: &ServerConfig) -> Result<Self> {
        let model = LogisticModel::load(&config.model_path)?;
        let raw = std::fs::read_to_string(&config.metrics_path).map_err(|e| {
            PimaError::Config(format!("cannot read {}: {e}", config.metrics_path.display()))
        })?;
        let metrics: MetricsDocument = serde_json::from_str(&raw)?;
        info!(path = %config.metrics_path.display(), "Metrics loaded");
        Ok(Self::new(model, metrics))
    }
}

pub type SharedState = Arc<AppState>;
