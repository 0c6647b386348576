use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Dataset file missing, unreadable or malformed. Fatal at startup.
    #[error("data access error: {0}")]
    DataAccess(String),

    /// Degenerate training data (constant column, count mismatch, bad k). Fatal at fit time.
    #[error("invalid training input: {0}")]
    InvalidInput(String),

    /// A submitted record did not parse as 13 finite numbers.
    #[error("invalid field '{field}': {reason}")]
    InputValidation { field: String, reason: String },

    /// Classifier produced a label the active risk schema has no entry for.
    #[error("label {0} has no risk tier")]
    UnmappedLabel(u32),
}

impl PipelineError {
    /// Per-call errors leave the pipeline usable; everything else should stop startup.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PipelineError::InputValidation { .. } | PipelineError::UnmappedLabel(_)
        )
    }
}

impl From<csv::Error> for PipelineError {
    fn from(e: csv::Error) -> Self {
        PipelineError::DataAccess(e.to_string())
    }
}
