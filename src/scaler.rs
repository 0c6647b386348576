use serde::Serialize;

use crate::error::{PipelineError, Result};
use crate::features::{FeatureVector, FEATURES, N_FEATURES};

/// Per-feature (min, max) recorded from the training set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinMaxScaler {
    data_min: FeatureVector,
    data_max: FeatureVector,
}

impl MinMaxScaler {
    /// Computes the min and max of each feature.
    ///
    /// A constant column has no usable range and is rejected rather than
    /// producing NaN on transform.
    pub fn fit(rows: &[FeatureVector]) -> Result<Self> {
        if rows.is_empty() {
            return Err(PipelineError::InvalidInput("cannot fit scaler with zero samples".into()));
        }

        let mut data_min = [f64::INFINITY; N_FEATURES];
        let mut data_max = [f64::NEG_INFINITY; N_FEATURES];
        for row in rows {
            for j in 0..N_FEATURES {
                data_min[j] = data_min[j].min(row[j]);
                data_max[j] = data_max[j].max(row[j]);
            }
        }

        for j in 0..N_FEATURES {
            if data_max[j] == data_min[j] {
                return Err(PipelineError::InvalidInput(format!(
                    "column '{}' is constant ({}) in training data",
                    FEATURES[j], data_min[j]
                )));
            }
        }

        Ok(Self { data_min, data_max })
    }

    /// Scales to [0, 1] against the fitted range. Values outside the training
    /// range extrapolate past the bounds; nothing is clamped.
    pub fn transform(&self, x: &FeatureVector) -> FeatureVector {
        let mut out = [0.0; N_FEATURES];
        for j in 0..N_FEATURES {
            out[j] = (x[j] - self.data_min[j]) / (self.data_max[j] - self.data_min[j]);
        }
        out
    }

    pub fn transform_all(&self, rows: &[FeatureVector]) -> Vec<FeatureVector> {
        rows.iter().map(|r| self.transform(r)).collect()
    }

    pub fn data_min(&self) -> &FeatureVector {
        &self.data_min
    }

    pub fn data_max(&self) -> &FeatureVector {
        &self.data_max
    }
}
