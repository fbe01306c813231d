//! Logistic-regression model bundle.
//!
//! The bundle is a JSON document produced offline:
//!
//! ```json
//! {
//!   "feature_order": ["Pregnancies", "Glucose", ...],
//!   "mean": [...], "scale": [...],
//!   "coefficients": [...],
//!   "intercept": -0.87
//! }
//! ```
//!
//! `mean` and `scale` are the fitted standard scaler and may be omitted.

use std::path::Path;
use std::str::FromStr;

use pima_common::{Feature, PatientFeatures, PimaError, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
struct ModelBundle {
    feature_order: Vec<String>,
    #[serde(default)]
    mean: Option<Vec<f64>>,
    #[serde(default)]
    scale: Option<Vec<f64>>,
    coefficients: Vec<f64>,
    intercept: f64,
    #[serde(default)]
    meta: Option<Value>,
}

/// Positive-class probability and the derived class decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inference {
    pub class: u8,
    /// Probability of `class`, rounded to 4 decimals.
    pub confidence: f64,
}

#[derive(Debug, Clone)]
pub struct LogisticModel {
    order: Vec<Feature>,
    mean: Vec<f64>,
    scale: Vec<f64>,
    coefficients: Vec<f64>,
    intercept: f64,
    best_model: Option<String>,
}

impl LogisticModel {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let model = Self::from_json(&raw)?;
        info!(
            path = %path.display(),
            features = model.order.len(),
            best_model = model.best_model().unwrap_or("unknown"),
            "Model loaded"
        );
        Ok(model)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let bundle: ModelBundle = serde_json::from_str(raw)?;
        Self::from_bundle(bundle)
    }

    fn from_bundle(bundle: ModelBundle) -> Result<Self> {
        let order = bundle
            .feature_order
            .iter()
            .map(|name| Feature::from_str(name))
            .collect::<Result<Vec<_>>>()?;

        let mut seen = order.clone();
        seen.sort();
        seen.dedup();
        if seen.len() != Feature::ALL.len() || order.len() != Feature::ALL.len() {
            return Err(PimaError::Model(format!(
                "feature_order must name each of the {} features exactly once",
                Feature::ALL.len()
            )));
        }

        let n = order.len();
        let check_len = |what: &str, len: usize| {
            if len == n {
                Ok(())
            } else {
                Err(PimaError::Model(format!("{what} has {len} values, expected {n}")))
            }
        };
        check_len("coefficients", bundle.coefficients.len())?;

        let mean = bundle.mean.unwrap_or_else(|| vec![0.0; n]);
        let scale = bundle.scale.unwrap_or_else(|| vec![1.0; n]);
        check_len("mean", mean.len())?;
        check_len("scale", scale.len())?;

        Ok(Self {
            order,
            mean,
            // A zero-variance column is left unscaled.
            scale: scale.into_iter().map(|s| if s == 0.0 { 1.0 } else { s }).collect(),
            coefficients: bundle.coefficients,
            intercept: bundle.intercept,
            best_model: bundle
                .meta
                .as_ref()
                .and_then(|meta| meta.get("best_model"))
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }

    pub fn feature_order(&self) -> &[Feature] {
        &self.order
    }

    /// Name of the estimator recorded in the bundle's `meta`, if any.
    pub fn best_model(&self) -> Option<&str> {
        self.best_model.as_deref()
    }

    /// Class probabilities `[p(0), p(1)]`.
    pub fn predict_proba(&self, features: &PatientFeatures) -> [f64; 2] {
        let z = self
            .order
            .iter()
            .enumerate()
            .fold(self.intercept, |acc, (i, &feature)| {
                let x = (features.get(feature) - self.mean[i]) / self.scale[i];
                acc + self.coefficients[i] * x
            });
        let p1 = sigmoid(z);
        [1.0 - p1, p1]
    }

    pub fn predict(&self, features: &PatientFeatures) -> Inference {
        let [p0, p1] = self.predict_proba(features);
        // argmax; ties resolve to the first class
        let (class, p) = if p1 > p0 { (1, p1) } else { (0, p0) };
        Inference { class, confidence: round4(p) }
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDER: &str = r#"["Pregnancies","Glucose","BloodPressure","SkinThickness","Insulin","BMI","DiabetesPedigreeFunction","Age"]"#;

    fn model(coefficients: [f64; 8], intercept: f64) -> LogisticModel {
        let raw = format!(
            r#"{{"feature_order":{ORDER},"coefficients":{},"intercept":{intercept}}}"#,
            serde_json::to_string(&coefficients).unwrap()
        );
        LogisticModel::from_json(&raw).unwrap()
    }

    #[test]
    fn test_zero_logit_is_a_tie_and_resolves_to_class_zero() {
        let m = model([0.0; 8], 0.0);
        let out = m.predict(&PatientFeatures::from_array([1.0; 8]));
        assert_eq!(out, Inference { class: 0, confidence: 0.5 });
    }

    #[test]
    fn test_positive_logit_predicts_diabetic() {
        // z = 0.05 * 148 - 5 = 2.4, sigmoid(2.4) = 0.91683
        let mut coefficients = [0.0; 8];
        coefficients[Feature::Glucose.index()] = 0.05;
        let m = model(coefficients, -5.0);
        let mut features = PatientFeatures::from_array([0.0; 8]);
        features.glucose = 148.0;
        let out = m.predict(&features);
        assert_eq!(out.class, 1);
        assert_eq!(out.confidence, 0.9168);
    }

    #[test]
    fn test_standardization_uses_mean_and_scale() {
        let raw = format!(
            r#"{{"feature_order":{ORDER},
                "mean":[0,100,0,0,0,0,0,0],
                "scale":[1,20,1,1,1,1,1,0],
                "coefficients":[0,1,0,0,0,0,0,0],
                "intercept":0}}"#
        );
        let m = LogisticModel::from_json(&raw).unwrap();
        let mut features = PatientFeatures::from_array([0.0; 8]);
        features.glucose = 80.0;
        // z = (80 - 100) / 20 = -1
        let [p0, p1] = m.predict_proba(&features);
        assert!((p1 - 0.268_941_4).abs() < 1e-6);
        assert!((p0 + p1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_feature_order_is_respected() {
        let order = r#"["Age","Glucose","BloodPressure","SkinThickness","Insulin","BMI","DiabetesPedigreeFunction","Pregnancies"]"#;
        let raw = format!(
            r#"{{"feature_order":{order},"coefficients":[1,0,0,0,0,0,0,0],"intercept":0}}"#
        );
        let m = LogisticModel::from_json(&raw).unwrap();
        let mut features = PatientFeatures::from_array([0.0; 8]);
        features.age = 3.0;
        assert_eq!(m.feature_order()[0], Feature::Age);
        assert_eq!(m.predict(&features).class, 1);
    }

    #[test]
    fn test_best_model_is_read_from_meta() {
        let raw = format!(
            r#"{{"feature_order":{ORDER},"coefficients":[0,0,0,0,0,0,0,0],"intercept":0,
                "meta":{{"best_model":"LogisticRegression"}}}}"#
        );
        assert_eq!(LogisticModel::from_json(&raw).unwrap().best_model(), Some("LogisticRegression"));
        assert_eq!(model([0.0; 8], 0.0).best_model(), None);
    }

    #[test]
    fn test_bundle_with_wrong_lengths_is_rejected() {
        let raw = format!(r#"{{"feature_order":{ORDER},"coefficients":[1,2],"intercept":0}}"#);
        let err = LogisticModel::from_json(&raw).unwrap_err();
        assert!(err.to_string().contains("coefficients has 2 values"));
    }

    #[test]
    fn test_bundle_with_unknown_or_repeated_feature_is_rejected() {
        let raw = r#"{"feature_order":["Glucose","Glucose","BloodPressure","SkinThickness","Insulin","BMI","DiabetesPedigreeFunction","Age"],"coefficients":[0,0,0,0,0,0,0,0],"intercept":0}"#;
        assert!(matches!(LogisticModel::from_json(raw), Err(PimaError::Model(_))));

        let raw = r#"{"feature_order":["Outcome"],"coefficients":[0],"intercept":0}"#;
        assert!(matches!(LogisticModel::from_json(raw), Err(PimaError::UnknownFeature(_))));
    }

    #[test]
    fn test_sigmoid_is_stable_for_large_inputs() {
        assert_eq!(sigmoid(800.0), 1.0);
        assert_eq!(sigmoid(-800.0), 0.0);
    }
}
