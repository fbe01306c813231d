//! The eight Pima Indians diabetes features and the request body built from them.
//! Field names on the wire are the column names of the original dataset.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PimaError;

/// Canonical feature order, shared by the form, the wire format and the model.
pub const FEATURE_NAMES: [&str; 8] = [
    "Pregnancies",
    "Glucose",
    "BloodPressure",
    "SkinThickness",
    "Insulin",
    "BMI",
    "DiabetesPedigreeFunction",
    "Age",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    Pregnancies,
    Glucose,
    BloodPressure,
    SkinThickness,
    Insulin,
    Bmi,
    DiabetesPedigreeFunction,
    Age,
}

impl Feature {
    pub const ALL: [Feature; 8] = [
        Feature::Pregnancies,
        Feature::Glucose,
        Feature::BloodPressure,
        Feature::SkinThickness,
        Feature::Insulin,
        Feature::Bmi,
        Feature::DiabetesPedigreeFunction,
        Feature::Age,
    ];

    /// Wire / form identifier of this feature.
    pub fn name(self) -> &'static str {
        FEATURE_NAMES[self.index()]
    }

    /// Position in [`FEATURE_NAMES`].
    pub fn index(self) -> usize {
        match self {
            Feature::Pregnancies              => 0,
            Feature::Glucose                  => 1,
            Feature::BloodPressure            => 2,
            Feature::SkinThickness            => 3,
            Feature::Insulin                  => 4,
            Feature::Bmi                      => 5,
            Feature::DiabetesPedigreeFunction => 6,
            Feature::Age                      => 7,
        }
    }

    /// Counts that the service only accepts as whole numbers.
    pub fn is_integer(self) -> bool {
        matches!(self, Feature::Pregnancies | Feature::Age)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = PimaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FEATURE_NAMES
            .iter()
            .position(|name| *name == s)
            .map(|i| Feature::ALL[i])
            .ok_or_else(|| PimaError::UnknownFeature(s.to_string()))
    }
}

/// One prediction request: every feature is always present.
///
/// Values are plain `f64` so that a non-numeric form entry can be carried as
/// NaN; `serde_json` writes non-finite floats as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientFeatures {
    #[serde(rename = "Pregnancies")]
    pub pregnancies: f64,
    #[serde(rename = "Glucose")]
    pub glucose: f64,
    #[serde(rename = "BloodPressure")]
    pub blood_pressure: f64,
    #[serde(rename = "SkinThickness")]
    pub skin_thickness: f64,
    #[serde(rename = "Insulin")]
    pub insulin: f64,
    #[serde(rename = "BMI")]
    pub bmi: f64,
    #[serde(rename = "DiabetesPedigreeFunction")]
    pub diabetes_pedigree_function: f64,
    #[serde(rename = "Age")]
    pub age: f64,
}

impl PatientFeatures {
    /// Build from values in canonical order.
    pub fn from_array(values: [f64; 8]) -> Self {
        Self {
            pregnancies:                values[0],
            glucose:                    values[1],
            blood_pressure:             values[2],
            skin_thickness:             values[3],
            insulin:                    values[4],
            bmi:                        values[5],
            diabetes_pedigree_function: values[6],
            age:                        values[7],
        }
    }

    pub fn to_array(&self) -> [f64; 8] {
        Feature::ALL.map(|f| self.get(f))
    }

    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Pregnancies              => self.pregnancies,
            Feature::Glucose                  => self.glucose,
            Feature::BloodPressure            => self.blood_pressure,
            Feature::SkinThickness            => self.skin_thickness,
            Feature::Insulin                  => self.insulin,
            Feature::Bmi                      => self.bmi,
            Feature::DiabetesPedigreeFunction => self.diabetes_pedigree_function,
            Feature::Age                      => self.age,
        }
    }

    /// Features whose value is NaN or infinite.
    pub fn non_finite(&self) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|f| !self.get(*f).is_finite())
            .collect()
    }
}
