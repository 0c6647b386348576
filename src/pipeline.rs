use serde_json::Value;
use std::collections::HashMap;

use crate::dataset::TrainingDataset;
use crate::error::Result;
use crate::features::{self, FeatureVector};
use crate::knn::KnnClassifier;
use crate::risk::{PredictionResult, RiskSchema};
use crate::scaler::MinMaxScaler;

/// Fitted scaler + classifier. Built once at startup and shared read-only;
/// nothing here mutates after `fit`, so `&PredictionPipeline` is safe to use
/// from any number of concurrent requests.
#[derive(Debug, Clone)]
pub struct PredictionPipeline {
    scaler: MinMaxScaler,
    knn: KnnClassifier,
    schema: RiskSchema,
}

impl PredictionPipeline {
    pub fn fit(dataset: &TrainingDataset, k: usize, schema: RiskSchema) -> Result<Self> {
        let scaler = MinMaxScaler::fit(dataset.features())?;
        let x_scaled = scaler.transform_all(dataset.features());
        let knn = KnnClassifier::fit(k, x_scaled, dataset.labels().to_vec())?;
        Ok(Self { scaler, knn, schema })
    }

    /// Raw label for an already-validated record.
    pub fn predict_label(&self, x: &FeatureVector) -> u32 {
        self.knn.predict(&self.scaler.transform(x))
    }

    /// Score one record given as 13 numbers in `FEATURES` order.
    pub fn predict_risk(&self, raw: &[f64]) -> Result<PredictionResult> {
        let x = features::from_values(raw)?;
        self.schema.classify(self.predict_label(&x))
    }

    /// Score a form submission keyed by feature name.
    pub fn predict_text_fields(&self, fields: &HashMap<String, String>) -> Result<PredictionResult> {
        let x = features::from_text_fields(fields)?;
        self.schema.classify(self.predict_label(&x))
    }

    pub fn predict_json_fields(
        &self,
        fields: &serde_json::Map<String, Value>,
    ) -> Result<PredictionResult> {
        let x = features::from_json_fields(fields)?;
        self.schema.classify(self.predict_label(&x))
    }

    pub fn scaler(&self) -> &MinMaxScaler {
        &self.scaler
    }

    pub fn schema(&self) -> RiskSchema {
        self.schema
    }

    pub fn k(&self) -> usize {
        self.knn.k()
    }

    pub fn n_samples(&self) -> usize {
        self.knn.n_samples()
    }
}
