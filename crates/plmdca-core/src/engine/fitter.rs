use crate::core::io::parameters::{ParameterFile, ParameterFileError, ParameterFormat};
use crate::core::models::shape::Biomolecule;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum FitError {
    #[error("Parameter backend failed: {0}")]
    Backend(String),

    #[error("Failed to load precomputed parameters from {path:?}: {source}")]
    ParameterFile {
        path: PathBuf,
        #[source]
        source: ParameterFileError,
    },
}

/// Everything a pseudo-likelihood backend needs for one fit, passed by value.
#[derive(Debug, Clone, PartialEq)]
pub struct FitRequest {
    pub biomolecule: Biomolecule,
    pub biomolecule_code: u16,
    pub num_states: usize,
    pub msa_path: PathBuf,
    pub sequence_length: usize,
    pub sequence_identity: f64,
    pub lambda_h: f64,
    pub lambda_j: f64,
    pub max_iterations: usize,
    pub num_threads: usize,
    pub verbose: bool,
}

/// A source of fitted fields and couplings.
///
/// Implementations return an owned array of `L*q + (L*(L-1)/2)*q*q` values laid out
/// as described in [`crate::core::indexing`]. The size is checked by the caller, so
/// a backend only has to hand over what it produced.
pub trait ParameterFitter {
    fn fit(&self, request: FitRequest) -> Result<Vec<f32>, FitError>;
}

impl<F> ParameterFitter for F
where
    F: Fn(FitRequest) -> Result<Vec<f32>, FitError>,
{
    fn fit(&self, request: FitRequest) -> Result<Vec<f32>, FitError> {
        self(request)
    }
}

/// Serves a parameter array that was fitted offline and saved to disk.
#[derive(Debug, Clone)]
pub struct PrecomputedFitter {
    path: PathBuf,
    format: ParameterFormat,
}

impl PrecomputedFitter {
    pub fn new(path: PathBuf) -> Self {
        let format = ParameterFormat::from_path(&path);
        Self { path, format }
    }

    pub fn with_format(path: PathBuf, format: ParameterFormat) -> Self {
        Self { path, format }
    }

    pub fn format(&self) -> ParameterFormat {
        self.format
    }
}

impl ParameterFitter for PrecomputedFitter {
    fn fit(&self, request: FitRequest) -> Result<Vec<f32>, FitError> {
        info!(
            path = ?self.path,
            format = ?self.format,
            biomolecule = %request.biomolecule,
            biomolecule_code = request.biomolecule_code,
            sequence_length = request.sequence_length,
            "Loading precomputed fields and couplings."
        );
        ParameterFile::read_from_path(&self.path, self.format).map_err(|source| {
            FitError::ParameterFile {
                path: self.path.clone(),
                source,
            }
        })
    }
}
