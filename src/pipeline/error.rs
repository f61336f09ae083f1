//! Error types for training and inference.
//!
//! Every failure the pipeline can report falls into one of four kinds.
//! `train` and `predict_one` return these instead of panicking, so a caller
//! can map them onto its own surface (exit codes, HTTP statuses, ...).

use thiserror::Error;

/// Errors reported by [`crate::pipeline::AttritionPipeline`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The training table cannot be used.
    ///
    /// Covers a missing `Attrition` column, an empty table, a target class
    /// with fewer than two rows (no stratified split possible), a table with
    /// no usable feature columns, or a column polars cannot read.
    #[error("Malformed dataset: {reason}")]
    MalformedDataset {
        /// Human-readable description of what is wrong
        reason: String,
    },

    /// Inference was attempted before any successful training.
    #[error("Model not trained")]
    NotTrained,

    /// A feature value cannot be coerced to the form the model expects.
    #[error("Cannot encode value for column '{column}': {reason}")]
    EncodingFailure {
        /// Schema column holding the offending value
        column: String,
        /// What went wrong during coercion
        reason: String,
    },

    /// Inference failed; wraps the underlying cause.
    #[error("Prediction failed: {source}")]
    PredictionError {
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        PipelineError::MalformedDataset {
            reason: reason.into(),
        }
    }

    pub fn encoding(column: impl Into<String>, reason: impl Into<String>) -> Self {
        PipelineError::EncodingFailure {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Wrap an inference-time failure as a `PredictionError`.
    ///
    /// `NotTrained` is passed through unchanged so callers can still tell the
    /// two states apart.
    pub fn prediction(cause: PipelineError) -> Self {
        match cause {
            PipelineError::NotTrained | PipelineError::PredictionError { .. } => cause,
            other => PipelineError::PredictionError {
                source: Box::new(other),
            },
        }
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::MalformedDataset { .. } => "MalformedDataset",
            PipelineError::NotTrained => "NotTrained",
            PipelineError::EncodingFailure { .. } => "EncodingFailure",
            PipelineError::PredictionError { .. } => "PredictionError",
        }
    }
}

impl From<polars::prelude::PolarsError> for PipelineError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        PipelineError::malformed(err.to_string())
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
