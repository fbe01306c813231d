//! Snapshot of the prediction form: element identifier → raw text.

use std::collections::BTreeMap;

use pima_common::{Feature, PatientFeatures};

use crate::coerce::coerce_number;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    fields: BTreeMap<String, String>,
}

impl FormInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn set(&mut self, id: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.fields.insert(id.into(), text.into());
        self
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.fields.get(id).map(String::as_str)
    }

    /// Read every feature field by its fixed identifier and coerce it.
    ///
    /// Returns the first missing identifier on failure. Non-numeric text
    /// becomes NaN here; whether that is acceptable is the caller's policy.
    pub fn to_features(&self) -> Result<PatientFeatures, &'static str> {
        let mut values = [0.0; 8];
        for feature in Feature::ALL {
            let text = self.get(feature.name()).ok_or(feature.name())?;
            values[feature.index()] = coerce_number(text);
        }
        Ok(PatientFeatures::from_array(values))
    }
}
