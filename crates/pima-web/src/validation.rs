//! Request body validation for `POST /predict`.
//!
//! Errors are reported per field in the shape HTTP clients of the service
//! already parse: `{"detail": [{"loc": ["body", field], "msg": ..., "type": ...}]}`.
//! Numeric strings are accepted and converted; every field must be present
//! and `>= 0`; `Pregnancies` and `Age` must be whole numbers.

use pima_common::{Feature, PatientFeatures};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// The offending input, when there was one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
}

impl FieldError {
    fn new(field: Option<Feature>, kind: &str, msg: &str, input: Option<&Value>) -> Self {
        let mut loc = vec!["body".to_string()];
        if let Some(field) = field {
            loc.push(field.name().to_string());
        }
        Self {
            loc,
            msg: msg.to_string(),
            kind: kind.to_string(),
            input: input.cloned(),
        }
    }
}

pub fn validate_patient(body: &Value) -> Result<PatientFeatures, Vec<FieldError>> {
    let Some(object) = body.as_object() else {
        return Err(vec![FieldError::new(
            None,
            "model_attributes_type",
            "Input should be a valid dictionary or object to extract fields from",
            Some(body),
        )]);
    };

    let mut values = [0.0; 8];
    let mut errors = Vec::new();
    for feature in Feature::ALL {
        match validate_field(object, feature) {
            Ok(v) => values[feature.index()] = v,
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(PatientFeatures::from_array(values))
    } else {
        Err(errors)
    }
}

fn validate_field(object: &Map<String, Value>, feature: Feature) -> Result<f64, FieldError> {
    let Some(input) = object.get(feature.name()) else {
        return Err(FieldError::new(Some(feature), "missing", "Field required", None));
    };

    let value = if feature.is_integer() {
        integer_value(input)
    } else {
        float_value(input)
    }
    .map_err(|(kind, msg)| FieldError::new(Some(feature), kind, msg, Some(input)))?;

    if value < 0.0 {
        return Err(FieldError::new(
            Some(feature),
            "greater_than_equal",
            "Input should be greater than or equal to 0",
            Some(input),
        ));
    }
    Ok(value)
}

type Rejection = (&'static str, &'static str);

fn float_value(input: &Value) -> Result<f64, Rejection> {
    match input {
        Value::Number(n) => n.as_f64().ok_or(FLOAT_TYPE),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(("float_parsing", "Input should be a valid number, unable to parse string as a number")),
        },
        _ => Err(FLOAT_TYPE),
    }
}

const FLOAT_TYPE: Rejection = ("float_type", "Input should be a valid number");
const INT_TYPE: Rejection = ("int_type", "Input should be a valid integer");

fn integer_value(input: &Value) -> Result<f64, Rejection> {
    match input {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i as f64);
            }
            if let Some(u) = n.as_u64() {
                return Ok(u as f64);
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 => Ok(f),
                Some(_) => Err((
                    "int_from_float",
                    "Input should be a valid integer, got a number with a fractional part",
                )),
                None => Err(INT_TYPE),
            }
        }
        Value::String(s) => s.trim().parse::<i64>().map(|i| i as f64).map_err(|_| {
            ("int_parsing", "Input should be a valid integer, unable to parse string as an integer")
        }),
        _ => Err(INT_TYPE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "Pregnancies": 6, "Glucose": 148, "BloodPressure": 72, "SkinThickness": 35,
            "Insulin": 0, "BMI": 33.6, "DiabetesPedigreeFunction": 0.627, "Age": 50
        })
    }

    fn kinds(errors: &[FieldError]) -> Vec<(String, String)> {
        errors.iter().map(|e| (e.loc[1].clone(), e.kind.clone())).collect()
    }

    #[test]
    fn test_valid_body_is_accepted() {
        let features = validate_patient(&valid()).unwrap();
        assert_eq!(
            features.to_array(),
            [6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0]
        );
    }

    #[test]
    fn test_numeric_strings_and_whole_floats_are_converted() {
        let mut body = valid();
        body["Glucose"] = json!("120.5");
        body["Age"] = json!(41.0);
        body["Pregnancies"] = json!("3");
        let features = validate_patient(&body).unwrap();
        assert_eq!(features.glucose, 120.5);
        assert_eq!(features.age, 41.0);
        assert_eq!(features.pregnancies, 3.0);
    }

    #[test]
    fn test_every_bad_field_is_reported_in_order() {
        let body = json!({
            "Pregnancies": 1.5, "Glucose": null, "BloodPressure": -1,
            "SkinThickness": "thick", "Insulin": 0, "BMI": 30,
            "DiabetesPedigreeFunction": 0.2
        });
        let errors = validate_patient(&body).unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![
                ("Pregnancies".to_string(), "int_from_float".to_string()),
                ("Glucose".to_string(), "float_type".to_string()),
                ("BloodPressure".to_string(), "greater_than_equal".to_string()),
                ("SkinThickness".to_string(), "float_parsing".to_string()),
                ("Age".to_string(), "missing".to_string()),
            ]
        );
        assert_eq!(errors[4].input, None);
        assert_eq!(errors[2].input, Some(json!(-1)));
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        let errors = validate_patient(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].loc, vec!["body".to_string()]);
        assert_eq!(errors[0].kind, "model_attributes_type");
    }

    #[test]
    fn test_error_serializes_with_type_key() {
        let errors = validate_patient(&json!({})).unwrap_err();
        let value = serde_json::to_value(&errors[0]).unwrap();
        assert_eq!(
            value,
            json!({"loc": ["body", "Pregnancies"], "msg": "Field required", "type": "missing"})
        );
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let mut body = valid();
        body["Outcome"] = json!(1);
        assert!(validate_patient(&body).is_ok());
    }
}
