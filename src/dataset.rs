use csv::ReaderBuilder;
use std::{collections::BTreeMap, io::Read, path::Path};

use crate::error::{PipelineError, Result};
use crate::features::{FeatureVector, FEATURES, N_FEATURES};

pub const DEFAULT_OUTCOME_COLUMN: &str = "output";

/// Training rows held in memory for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct TrainingDataset {
    features: Vec<FeatureVector>,
    labels: Vec<u32>,
}

impl TrainingDataset {
    /// Read a headered CSV file. Columns are looked up by name, so their order
    /// in the file does not matter and extra columns are ignored.
    pub fn load(path: impl AsRef<Path>, outcome_column: &str) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            PipelineError::DataAccess(format!("cannot open {}: {}", path.display(), e))
        })?;
        Self::from_reader(file, outcome_column)
    }

    pub fn from_reader<R: Read>(rdr: R, outcome_column: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(rdr);

        let headers = reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| PipelineError::DataAccess(format!("missing column '{}'", name)))
        };
        let mut feature_idx = [0usize; N_FEATURES];
        for (slot, name) in feature_idx.iter_mut().zip(FEATURES) {
            *slot = column(name)?;
        }
        let outcome_idx = column(outcome_column)?;

        let mut features = Vec::new();
        let mut labels = Vec::new();
        for (row, result) in reader.records().enumerate() {
            let record = result?;
            // header is line 1
            let line = row + 2;
            let cell = |idx: usize, name: &str| -> Result<f64> {
                let raw = record.get(idx).unwrap_or("");
                raw.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| {
                        PipelineError::DataAccess(format!(
                            "line {}: column '{}' has non-numeric value '{}'",
                            line, name, raw
                        ))
                    })
            };

            let mut fv = [0.0; N_FEATURES];
            for (i, name) in FEATURES.iter().enumerate() {
                fv[i] = cell(feature_idx[i], name)?;
            }
            let outcome = cell(outcome_idx, outcome_column)?;
            if outcome < 0.0 || outcome.fract() != 0.0 || outcome > u32::MAX as f64 {
                return Err(PipelineError::DataAccess(format!(
                    "line {}: outcome '{}' is not a class label",
                    line, outcome
                )));
            }
            features.push(fv);
            labels.push(outcome as u32);
        }

        if features.is_empty() {
            return Err(PipelineError::DataAccess("dataset has no rows".into()));
        }
        Ok(Self { features, labels })
    }

    pub fn features(&self) -> &[FeatureVector] {
        &self.features
    }

    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Row count per label, for startup logging.
    pub fn label_counts(&self) -> BTreeMap<u32, usize> {
        let mut counts = BTreeMap::new();
        for &l in &self.labels {
            *counts.entry(l).or_insert(0) += 1;
        }
        counts
    }
}
