//! The form submission handler.
//!
//! One submit is a linear sequence: read the form, POST `/predict`, render the
//! prediction, GET `/metrics`, render the metrics. Prediction failures and
//! metrics failures are reported to the user separately.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pima_common::{MetricsDocument, PredictionResponse};
use pima_config::{ClientConfig, NanPolicy};
use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::api::{ApiError, PredictionApi};
use crate::form::FormInput;
use crate::view::View;

pub const PREDICTION_FAILED_PREFIX: &str = "Prediction failed: ";
pub const METRICS_UNAVAILABLE_PREFIX: &str = "Metrics unavailable: ";

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("missing form field {0}")]
    MissingField(String),
    #[error("{field} is not a number: {text:?}")]
    InvalidField { field: String, text: String },
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug)]
pub enum MetricsStatus {
    Shown(MetricsDocument),
    Unavailable(ApiError),
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Another submission was still pending.
    Ignored,
    /// The prediction step failed; nothing after it ran.
    Failed(SubmitError),
    Predicted {
        response: PredictionResponse,
        metrics: MetricsStatus,
    },
}

impl SubmitOutcome {
    pub fn is_predicted(&self) -> bool {
        matches!(self, SubmitOutcome::Predicted { .. })
    }
}

/// Clears the in-flight flag when a submission ends, however it ends.
struct PendingGuard<'a>(&'a AtomicBool);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct FormHandler {
    api: Arc<dyn PredictionApi>,
    view: Arc<dyn View>,
    nan_policy: NanPolicy,
    ignore_while_pending: bool,
    pending: AtomicBool,
}

impl FormHandler {
    /// Build the handler and show the configured API URL.
    pub fn new(config: &ClientConfig, api: Arc<dyn PredictionApi>, view: Arc<dyn View>) -> Self {
        view.show_api_url(api.base_url());
        Self {
            api,
            view,
            nan_policy: config.nan_policy,
            ignore_while_pending: config.ignore_while_pending,
            pending: AtomicBool::new(false),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Handle one form submission.
    pub async fn on_submit(&self, form: &FormInput) -> SubmitOutcome {
        let _guard = if self.ignore_while_pending {
            if self
                .pending
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                info!("Submission ignored: a prediction is already pending");
                return SubmitOutcome::Ignored;
            }
            Some(PendingGuard(&self.pending))
        } else {
            None
        };

        let span = info_span!("submit", id = %Uuid::new_v4());
        self.run(form).instrument(span).await
    }

    async fn run(&self, form: &FormInput) -> SubmitOutcome {
        let response = match self.predict(form).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Prediction failed");
                self.view.notify(&format!("{PREDICTION_FAILED_PREFIX}{e}"));
                return SubmitOutcome::Failed(e);
            }
        };

        self.view.set_result_text(&response.result);
        self.view.set_prediction(&response.prediction_text());
        self.view.set_confidence(&response.confidence_text());
        self.view.reveal_result();
        info!(result = %response.result, confidence = response.confidence, "Prediction rendered");

        let metrics = match self.api.metrics().await {
            Ok(doc) => {
                self.view.set_metrics(&doc.to_pretty());
                MetricsStatus::Shown(doc)
            }
            Err(e) => {
                warn!(error = %e, "Metrics fetch failed");
                self.view.notify(&format!("{METRICS_UNAVAILABLE_PREFIX}{e}"));
                MetricsStatus::Unavailable(e)
            }
        };

        SubmitOutcome::Predicted { response, metrics }
    }

    async fn predict(&self, form: &FormInput) -> Result<PredictionResponse, SubmitError> {
        let features = form
            .to_features()
            .map_err(|field| SubmitError::MissingField(field.to_string()))?;

        let non_finite = features.non_finite();
        if !non_finite.is_empty() {
            match self.nan_policy {
                NanPolicy::Reject => {
                    let field = non_finite[0].name();
                    return Err(SubmitError::InvalidField {
                        field: field.to_string(),
                        text: form.get(field).unwrap_or_default().to_string(),
                    });
                }
                NanPolicy::PassThrough => {
                    warn!(fields = ?non_finite, "Submitting non-numeric fields as null");
                }
            }
        }

        Ok(self.api.predict(&features).await?)
    }
}
