//! Evaluation metrics published by the service at `GET /metrics`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Arbitrary JSON document; the client only pretty-prints it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricsDocument(pub Value);

impl MetricsDocument {
    /// Two-space indented JSON, keys in the order they were received.
    pub fn to_pretty(&self) -> String {
        format!("{:#}", self.0)
    }
}

impl fmt::Display for MetricsDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pretty())
    }
}
