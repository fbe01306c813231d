//! Prediction service API trait and the reqwest implementation.
//!
//! Endpoints:
//!   POST {base}/predict : eight features in, `{result, prediction, confidence}` out
//!   GET  {base}/metrics : evaluation metrics, arbitrary JSON
//!   GET  {base}/health  : liveness probe

use async_trait::async_trait;
use pima_common::{MetricsDocument, PatientFeatures, PredictionResponse};
use pima_config::ClientConfig;
use thiserror::Error;
use tracing::debug;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    /// Non-success status; the message is the raw response body.
    #[error("{body}")]
    Remote { status: u16, body: String },
    #[error("invalid JSON in response: {0}")]
    Parse(#[from] serde_json::Error),
}

// ── Trait ─────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait PredictionApi: Send + Sync {
    async fn predict(&self, features: &PatientFeatures) -> Result<PredictionResponse, ApiError>;
    async fn metrics(&self) -> Result<MetricsDocument, ApiError>;
    async fn health(&self) -> Result<serde_json::Value, ApiError>;
    fn base_url(&self) -> &str;
}

/// Fail with the body text on a non-success status, otherwise return the body bytes.
async fn read_success_body(resp: reqwest::Response) -> Result<Vec<u8>, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await?;
        return Err(ApiError::Remote { status: status.as_u16(), body });
    }
    Ok(resp.bytes().await?.to_vec())
}

// ── HTTP ──────────────────────────────────────────────────────────────────────

pub struct HttpPredictionApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPredictionApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { base_url: config.api_url.clone(), client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl PredictionApi for HttpPredictionApi {
    async fn predict(&self, features: &PatientFeatures) -> Result<PredictionResponse, ApiError> {
        let url = self.url("predict");
        let body = serde_json::to_vec(features)?;
        debug!(%url, "POST predict");
        let resp = self.client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        let bytes = read_success_body(resp).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn metrics(&self) -> Result<MetricsDocument, ApiError> {
        let url = self.url("metrics");
        debug!(%url, "GET metrics");
        let resp = self.client.get(&url).send().await?;
        let bytes = read_success_body(resp).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn health(&self) -> Result<serde_json::Value, ApiError> {
        let resp = self.client.get(self.url("health")).send().await?;
        let bytes = read_success_body(resp).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn base_url(&self) -> &str { &self.base_url }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
