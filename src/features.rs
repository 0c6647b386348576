use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{PipelineError, Result};

pub const N_FEATURES: usize = 13;

/// Column order of every feature vector, training and inference alike.
pub const FEATURES: [&str; N_FEATURES] = [
    "age", "sex", "cp", "trtbps", "chol", "fbs", "restecg", "thalachh", "exng", "oldpeak", "slp",
    "caa", "thall",
];

pub type FeatureVector = [f64; N_FEATURES];

/// Input hints for one feature, used by front-ends to build their forms.
/// Bounds are presentation hints only; the pipeline accepts any finite value.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: f64,
}

const fn field(name: &'static str, label: &'static str, min: f64, max: f64) -> FieldSpec {
    FieldSpec { name, label, min: Some(min), max: Some(max), step: 1.0 }
}

pub static FIELD_SPECS: [FieldSpec; N_FEATURES] = [
    field("age", "Age (Years)", 18.0, 100.0),
    field("sex", "Sex (0: Female, 1: Male)", 0.0, 1.0),
    field("cp", "Chest Pain Type (0-3)", 0.0, 3.0),
    field("trtbps", "Resting BP (mm Hg)", 80.0, 200.0),
    field("chol", "Cholesterol (mg/dL)", 100.0, 400.0),
    field("fbs", "Fasting Blood Sugar > 120 mg/dL (0-1)", 0.0, 1.0),
    field("restecg", "Resting ECG (0-2)", 0.0, 2.0),
    field("thalachh", "Max Heart Rate (bpm)", 60.0, 220.0),
    field("exng", "Exercise Angina (0-1)", 0.0, 1.0),
    FieldSpec { name: "oldpeak", label: "Old Peak (ST Depression)", min: Some(0.0), max: Some(6.0), step: 0.1 },
    field("slp", "Slope (0-2)", 0.0, 2.0),
    field("caa", "Number of Vessels (0-4)", 0.0, 4.0),
    field("thall", "Thal (0-3)", 0.0, 3.0),
];

fn invalid(field: &str, reason: impl Into<String>) -> PipelineError {
    PipelineError::InputValidation { field: field.to_string(), reason: reason.into() }
}

fn parse_value(field: &str, raw: &str) -> Result<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(invalid(field, "value is empty"));
    }
    let v: f64 = raw
        .parse()
        .map_err(|_| invalid(field, format!("'{}' is not a number", raw)))?;
    check_finite(field, v)
}

fn check_finite(field: &str, v: f64) -> Result<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(invalid(field, "value must be finite"))
    }
}

/// Validate an already-parsed record in `FEATURES` order.
pub fn from_values(values: &[f64]) -> Result<FeatureVector> {
    if values.len() != N_FEATURES {
        return Err(invalid(
            "record",
            format!("expected {} values, got {}", N_FEATURES, values.len()),
        ));
    }
    let mut out = [0.0; N_FEATURES];
    for (i, (&v, name)) in values.iter().zip(FEATURES).enumerate() {
        out[i] = check_finite(name, v)?;
    }
    Ok(out)
}

/// Build a vector from text fields keyed by feature name (form submissions).
/// Unknown keys are ignored.
pub fn from_text_fields(fields: &HashMap<String, String>) -> Result<FeatureVector> {
    let mut out = [0.0; N_FEATURES];
    for (i, name) in FEATURES.iter().enumerate() {
        let raw = fields.get(*name).ok_or_else(|| invalid(name, "field is missing"))?;
        out[i] = parse_value(name, raw)?;
    }
    Ok(out)
}

/// Build a vector from a flat JSON object. Values may be numbers or numeric strings.
pub fn from_json_fields(fields: &serde_json::Map<String, Value>) -> Result<FeatureVector> {
    let mut out = [0.0; N_FEATURES];
    for (i, name) in FEATURES.iter().enumerate() {
        out[i] = match fields.get(*name) {
            Some(Value::Number(n)) => {
                let v = n.as_f64().ok_or_else(|| invalid(name, "number out of range"))?;
                check_finite(name, v)?
            }
            Some(Value::String(s)) => parse_value(name, s)?,
            Some(_) => return Err(invalid(name, "expected a number")),
            None => return Err(invalid(name, "field is missing")),
        };
    }
    Ok(out)
}
