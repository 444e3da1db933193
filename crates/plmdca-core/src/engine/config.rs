use super::fitter::FitRequest;
use crate::core::models::alignment::AlignmentSummary;
use crate::core::models::shape::{AlignmentShape, Biomolecule, ShapeError};
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_SEQUENCE_IDENTITY: f64 = 0.8;
pub const DEFAULT_LAMBDA_H: f64 = 1.0;
/// `lambda_J` defaults to this factor times `L - 1`.
pub const DEFAULT_LAMBDA_J_FACTOR: f64 = 0.2;
pub const DEFAULT_MAX_ITERATIONS: usize = 100;
pub const DEFAULT_NUM_THREADS: usize = 1;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: &'static str, reason: String },

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegularizationConfig {
    pub lambda_h: f64,
    pub lambda_j: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub max_iterations: usize,
    pub num_threads: usize,
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub biomolecule: Biomolecule,
    pub msa_path: PathBuf,
    pub alignment: AlignmentSummary,
    pub sequence_identity: f64,
    pub regularization: RegularizationConfig,
    pub backend: BackendConfig,
}

impl AnalysisConfig {
    pub fn shape(&self) -> Result<AlignmentShape, ShapeError> {
        AlignmentShape::for_biomolecule(self.biomolecule, self.alignment.sequence_length)
    }

    pub fn fit_request(&self) -> FitRequest {
        FitRequest {
            biomolecule: self.biomolecule,
            biomolecule_code: self.biomolecule.backend_code(),
            num_states: self.biomolecule.num_states(),
            msa_path: self.msa_path.clone(),
            sequence_length: self.alignment.sequence_length,
            sequence_identity: self.sequence_identity,
            lambda_h: self.regularization.lambda_h,
            lambda_j: self.regularization.lambda_j,
            max_iterations: self.backend.max_iterations,
            num_threads: self.backend.num_threads,
            verbose: self.backend.verbose,
        }
    }
}

#[derive(Default)]
pub struct AnalysisConfigBuilder {
    biomolecule: Option<Biomolecule>,
    msa_path: Option<PathBuf>,
    alignment: Option<AlignmentSummary>,
    sequence_identity: Option<f64>,
    lambda_h: Option<f64>,
    lambda_j: Option<f64>,
    max_iterations: Option<usize>,
    num_threads: Option<usize>,
    verbose: Option<bool>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn biomolecule(mut self, biomolecule: Biomolecule) -> Self {
        self.biomolecule = Some(biomolecule);
        self
    }
    pub fn msa_path(mut self, path: PathBuf) -> Self {
        self.msa_path = Some(path);
        self
    }
    pub fn alignment(mut self, summary: AlignmentSummary) -> Self {
        self.alignment = Some(summary);
        self
    }
    pub fn sequence_identity(mut self, seqid: f64) -> Self {
        self.sequence_identity = Some(seqid);
        self
    }
    pub fn lambda_h(mut self, lambda: f64) -> Self {
        self.lambda_h = Some(lambda);
        self
    }
    pub fn lambda_j(mut self, lambda: f64) -> Self {
        self.lambda_j = Some(lambda);
        self
    }
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }
    pub fn num_threads(mut self, n: usize) -> Self {
        self.num_threads = Some(n);
        self
    }
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let biomolecule = self
            .biomolecule
            .ok_or(ConfigError::MissingParameter("biomolecule"))?;
        let msa_path = self
            .msa_path
            .ok_or(ConfigError::MissingParameter("msa_path"))?;
        let alignment = self
            .alignment
            .ok_or(ConfigError::MissingParameter("alignment"))?;
        AlignmentShape::for_biomolecule(biomolecule, alignment.sequence_length)?;
        if alignment.num_sequences == 0 {
            return Err(ConfigError::InvalidValue {
                name: "alignment",
                reason: "the alignment contains no sequences".to_string(),
            });
        }

        let sequence_identity = self.sequence_identity.unwrap_or(DEFAULT_SEQUENCE_IDENTITY);
        if !(sequence_identity > 0.0 && sequence_identity <= 1.0) {
            return Err(ConfigError::InvalidValue {
                name: "sequence_identity",
                reason: format!("{} is outside (0, 1]", sequence_identity),
            });
        }

        let lambda_h = self.lambda_h.unwrap_or(DEFAULT_LAMBDA_H);
        check_non_negative("lambda_h", lambda_h)?;
        let lambda_j = self
            .lambda_j
            .unwrap_or(DEFAULT_LAMBDA_J_FACTOR * (alignment.sequence_length - 1) as f64);
        check_non_negative("lambda_j", lambda_j)?;

        let num_threads = self.num_threads.unwrap_or(DEFAULT_NUM_THREADS);
        if num_threads == 0 {
            return Err(ConfigError::InvalidValue {
                name: "num_threads",
                reason: "at least one thread is required".to_string(),
            });
        }

        Ok(AnalysisConfig {
            biomolecule,
            msa_path,
            alignment,
            sequence_identity,
            regularization: RegularizationConfig { lambda_h, lambda_j },
            backend: BackendConfig {
                max_iterations: self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
                num_threads,
                verbose: self.verbose.unwrap_or(false),
            },
        })
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            name,
            reason: format!("must be a non-negative number, got {}", value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::new()
            .biomolecule(Biomolecule::Protein)
            .msa_path(PathBuf::from("msa.fa"))
            .alignment(AlignmentSummary {
                num_sequences: 50,
                sequence_length: 11,
            })
    }

    #[test]
    fn build_applies_defaults() {
        let config = base_builder().build().unwrap();
        assert_eq!(config.sequence_identity, 0.8);
        assert_eq!(config.regularization.lambda_h, 1.0);
        assert!((config.regularization.lambda_j - 2.0).abs() < 1e-12);
        assert_eq!(config.backend.max_iterations, 100);
        assert_eq!(config.backend.num_threads, 1);
        assert!(!config.backend.verbose);
        assert_eq!(config.shape().unwrap().num_states(), 21);
    }

    #[test]
    fn build_fails_on_missing_required_parameter() {
        let result = AnalysisConfigBuilder::new()
            .biomolecule(Biomolecule::Rna)
            .msa_path(PathBuf::from("msa.fa"))
            .build();
        assert_eq!(result, Err(ConfigError::MissingParameter("alignment")));
    }

    #[test]
    fn build_rejects_out_of_range_sequence_identity() {
        for seqid in [0.0, -0.5, 1.01, f64::NAN] {
            let result = base_builder().sequence_identity(seqid).build();
            assert!(matches!(
                result,
                Err(ConfigError::InvalidValue {
                    name: "sequence_identity",
                    ..
                })
            ));
        }
        assert!(base_builder().sequence_identity(1.0).build().is_ok());
    }

    #[test]
    fn build_rejects_negative_regularization() {
        assert!(matches!(
            base_builder().lambda_h(-1.0).build(),
            Err(ConfigError::InvalidValue { name: "lambda_h", .. })
        ));
        assert!(matches!(
            base_builder().lambda_j(-0.1).build(),
            Err(ConfigError::InvalidValue { name: "lambda_j", .. })
        ));
        assert!(base_builder().lambda_h(0.0).lambda_j(0.0).build().is_ok());
    }

    #[test]
    fn build_rejects_single_site_alignment() {
        let result = base_builder()
            .alignment(AlignmentSummary {
                num_sequences: 3,
                sequence_length: 1,
            })
            .build();
        assert_eq!(result, Err(ConfigError::Shape(ShapeError::TooFewSites(1))));
    }

    #[test]
    fn build_rejects_zero_threads() {
        assert!(matches!(
            base_builder().num_threads(0).build(),
            Err(ConfigError::InvalidValue { name: "num_threads", .. })
        ));
    }

    #[test]
    fn fit_request_carries_every_backend_argument() {
        let config = base_builder()
            .lambda_j(3.5)
            .max_iterations(250)
            .num_threads(4)
            .verbose(true)
            .build()
            .unwrap();
        let request = config.fit_request();
        assert_eq!(request.biomolecule, Biomolecule::Protein);
        assert_eq!(request.biomolecule_code, 1);
        assert_eq!(request.num_states, 21);
        assert_eq!(request.msa_path, PathBuf::from("msa.fa"));
        assert_eq!(request.sequence_length, 11);
        assert_eq!(request.lambda_j, 3.5);
        assert_eq!(request.max_iterations, 250);
        assert_eq!(request.num_threads, 4);
        assert!(request.verbose);
    }
}
