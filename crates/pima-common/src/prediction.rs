//! Prediction response returned by `POST /predict`.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Display label for class 1.
pub const LABEL_DIABETIC: &str = "Diabetic";
/// Display label for class 0.
pub const LABEL_NOT_DIABETIC: &str = "Not Diabetic";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: Value, // class code or label, rendered as-is
    pub result: String,
    pub confidence: f64,   // expected in [0, 1]
}

impl PredictionResponse {
    /// Response for a binary class produced by the service.
    pub fn for_class(class: u8, confidence: f64) -> Self {
        let result = if class == 1 { LABEL_DIABETIC } else { LABEL_NOT_DIABETIC };
        Self {
            prediction: Value::from(class),
            result: result.to_string(),
            confidence,
        }
    }

    /// Text shown in the prediction region: strings unquoted, numbers without
    /// a trailing `.0`.
    pub fn prediction_text(&self) -> String {
        match &self.prediction {
            Value::String(s) => s.clone(),
            Value::Number(n) => match n.as_f64() {
                Some(f) if n.is_f64() && f == 0.0 => "0".to_string(),
                Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
                _ => n.to_string(),
            },
            other => other.to_string(),
        }
    }

    pub fn confidence_text(&self) -> String {
        format_confidence(self.confidence)
    }
}

/// Confidence as a percentage with two decimals, e.g. `0.873` → `87.30%`.
///
/// Midpoints round away from zero, so `0.00625` shows as `0.63%`.
pub fn format_confidence(confidence: f64) -> String {
    let percent = confidence * 100.0;
    if percent.is_nan() {
        return "NaN%".to_string();
    }
    if percent.is_infinite() {
        return if percent > 0.0 { "Infinity%" } else { "-Infinity%" }.to_string();
    }
    match Decimal::from_f64_retain(percent) {
        Some(d) => {
            let rounded = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            format!("{rounded:.2}%")
        }
        None => format!("{percent:.2}%"),
    }
}
