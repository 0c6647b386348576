//! Heart-attack risk screening: min-max scaling and k-nearest-neighbours over
//! a fixed 13-feature patient schema, fitted once at startup and served over HTTP.

pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod knn;
pub mod pipeline;
pub mod risk;
pub mod scaler;
pub mod server;

pub use dataset::TrainingDataset;
pub use error::{PipelineError, Result};
pub use pipeline::PredictionPipeline;
pub use risk::{PredictionResult, RiskSchema, RiskTier};
