use super::config::ConfigError;
use super::fitter::FitError;
use crate::core::indexing::IndexError;
use crate::core::models::parameters::ParameterError;
use crate::core::models::shape::ShapeError;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid shape, hyperparameters or backend output size. Re-run with corrected inputs.
    Configuration,
    /// A size or count invariant broke inside the pipeline. Indicates a bug.
    InternalConsistency,
    /// The input is well-formed but the scores cannot be corrected.
    DegenerateInput,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid alignment shape: {0}")]
    Shape(#[from] ShapeError),

    #[error("Invalid parameter array: {0}")]
    Parameters(#[from] ParameterError),

    #[error("Parameter fitting failed: {0}")]
    Fitting(#[from] FitError),

    #[error("Index mapping failed: {0}")]
    Index(#[from] IndexError),

    #[error("Internal consistency violated: {0}")]
    InternalConsistency(String),

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),
}

impl EngineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EngineError::Config(_)
            | EngineError::Shape(_)
            | EngineError::Parameters(_)
            | EngineError::Fitting(_) => ErrorCategory::Configuration,
            EngineError::Index(_) | EngineError::InternalConsistency(_) => {
                ErrorCategory::InternalConsistency
            }
            EngineError::DegenerateInput(_) => ErrorCategory::DegenerateInput,
        }
    }
}
