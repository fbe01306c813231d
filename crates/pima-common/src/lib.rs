//! pima-common: Wire types and errors shared by the prediction client and service.

pub mod error;
pub mod features;
pub mod prediction;
pub mod metrics;

// Re-export commonly used types
pub use error::{PimaError, Result};
pub use features::{Feature, PatientFeatures, FEATURE_NAMES};
pub use metrics::MetricsDocument;
pub use prediction::{format_confidence, PredictionResponse};
