use crate::core::models::parameters::{NonGapCouplings, RawParameters};
use crate::core::models::score::PairScore;
use crate::core::models::shape::AlignmentShape;
use crate::engine::config::AnalysisConfig;
use crate::engine::error::EngineError;
use crate::engine::fitter::ParameterFitter;
use crate::engine::progress::ProgressReporter;
use crate::engine::tasks;
use tracing::{error, info, instrument};

/// Frobenius-norm DCA scores without average product correction, sorted descending.
#[instrument(skip_all, name = "sorted_fn_workflow")]
pub fn compute_sorted_fn(
    config: &AnalysisConfig,
    fitter: &dyn ParameterFitter,
    reporter: &ProgressReporter,
) -> Result<Vec<PairScore>, EngineError> {
    let couplings = couplings_no_gap_state(config, fitter, reporter)?;

    reporter.phase("Scoring Site Pairs", || {
        info!("Computing non-APC sorted DCA scores.");
        tasks::frobenius::run(&couplings, reporter)
    })
}

/// Frobenius-norm DCA scores after average product correction, sorted descending.
#[instrument(skip_all, name = "sorted_fn_apc_workflow")]
pub fn compute_sorted_fn_apc(
    config: &AnalysisConfig,
    fitter: &dyn ParameterFitter,
    reporter: &ProgressReporter,
) -> Result<Vec<PairScore>, EngineError> {
    let raw_scores = compute_sorted_fn(config, fitter, reporter)?;

    reporter.phase("Average Product Correction", || {
        info!("Performing average product correction (APC) of Frobenius norm scores.");
        tasks::apc::run(&raw_scores, config.alignment.sequence_length)
    })
}

/// Fits the model and keeps only the couplings between non-gap states.
///
/// The raw backend array never outlives this call.
pub fn couplings_no_gap_state(
    config: &AnalysisConfig,
    fitter: &dyn ParameterFitter,
    reporter: &ProgressReporter,
) -> Result<NonGapCouplings, EngineError> {
    let shape = config.shape()?;
    log_analysis(config, shape);

    let parameters = compute_params(config, shape, fitter, reporter)?;

    reporter.phase("Extracting Couplings", || tasks::extraction::run(parameters))
}

/// Runs the fitter and checks the returned array against the analytic size.
pub fn compute_params(
    config: &AnalysisConfig,
    shape: AlignmentShape,
    fitter: &dyn ParameterFitter,
    reporter: &ProgressReporter,
) -> Result<RawParameters, EngineError> {
    reporter.phase("Fitting Parameters", || {
        info!("Computing fields and couplings with the parameter backend.");
        let values = fitter.fit(config.fit_request())?;

        info!(
            expected = shape.parameter_count(),
            obtained = values.len(),
            "Received fields and couplings from the parameter backend."
        );
        RawParameters::new(shape, values).map_err(|e| {
            error!("Data size mismatch from the parameter backend: {}", e);
            EngineError::from(e)
        })
    })
}

fn log_analysis(config: &AnalysisConfig, shape: AlignmentShape) {
    info!(
        biomolecule = %config.biomolecule,
        sequence_length = shape.num_sites(),
        num_sequences = config.alignment.num_sequences,
        num_states = shape.num_states(),
        sequence_identity = config.sequence_identity,
        lambda_h = config.regularization.lambda_h,
        lambda_j = config.regularization.lambda_j,
        max_iterations = config.backend.max_iterations,
        num_threads = config.backend.num_threads,
        "Starting plmDCA analysis."
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::alignment::AlignmentSummary;
    use crate::core::models::shape::Biomolecule;
    use crate::engine::config::AnalysisConfigBuilder;
    use crate::engine::error::ErrorCategory;
    use crate::engine::fitter::{FitError, FitRequest};
    use crate::engine::progress::Progress;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    fn rna_config(sequence_length: usize) -> AnalysisConfig {
        AnalysisConfigBuilder::new()
            .biomolecule(Biomolecule::Rna)
            .msa_path(PathBuf::from("rna.fa"))
            .alignment(AlignmentSummary {
                num_sequences: 20,
                sequence_length,
            })
            .build()
            .unwrap()
    }

    /// Coupling `J_ij(a, b) = (i + 1) * (j + 1) * (a == b)` for non-gap states, zero elsewhere.
    fn diagonal_fitter(request: FitRequest) -> Result<Vec<f32>, FitError> {
        let shape = AlignmentShape::new(request.sequence_length, request.num_states).unwrap();
        let indexer = crate::core::indexing::PairIndexer::new(shape);
        let mut values = vec![0.0f32; shape.parameter_count()];
        for pair in indexer.pairs() {
            for a in 0..shape.num_non_gap_states() {
                let k = indexer.flat_index(pair.i, pair.j, a, a).unwrap();
                values[k] = ((pair.i + 1) * (pair.j + 1)) as f32;
            }
        }
        Ok(values)
    }

    #[test]
    fn sorted_fn_ranks_strongest_pairs_first() {
        let config = rna_config(4);
        let scores = compute_sorted_fn(&config, &diagonal_fitter, &ProgressReporter::new()).unwrap();

        assert_eq!(scores.len(), 6);
        let pairs: Vec<_> = scores.iter().map(|s| (s.pair.i, s.pair.j)).collect();
        assert_eq!(pairs, vec![(2, 3), (1, 3), (1, 2), (0, 3), (0, 2), (0, 1)]);
        assert!(scores.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn sorted_fn_apc_returns_corrected_scores_for_every_pair() {
        let config = rna_config(5);
        let raw = compute_sorted_fn(&config, &diagonal_fitter, &ProgressReporter::new()).unwrap();
        let apc =
            compute_sorted_fn_apc(&config, &diagonal_fitter, &ProgressReporter::new()).unwrap();

        assert_eq!(apc.len(), raw.len());
        assert!(apc.windows(2).all(|w| w[0].score >= w[1].score));
        let raw_sum: f64 = raw.iter().map(|s| s.score).sum();
        let apc_sum: f64 = apc.iter().map(|s| s.score).sum();
        assert!(apc_sum < raw_sum);
    }

    #[test]
    fn size_mismatch_from_backend_is_a_configuration_error() {
        let config = rna_config(4);
        let short_fitter = |request: FitRequest| -> Result<Vec<f32>, FitError> {
            Ok(vec![0.0; request.sequence_length])
        };
        let err = compute_sorted_fn(&config, &short_fitter, &ProgressReporter::new()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(matches!(err, EngineError::Parameters(_)));
    }

    #[test]
    fn backend_failure_is_propagated() {
        let config = rna_config(4);
        let failing = |_: FitRequest| -> Result<Vec<f32>, FitError> {
            Err(FitError::Backend("did not converge".to_string()))
        };
        let err = couplings_no_gap_state(&config, &failing, &ProgressReporter::new()).unwrap_err();
        assert!(matches!(err, EngineError::Fitting(FitError::Backend(_))));
    }

    #[test]
    fn all_zero_couplings_make_apc_degenerate() {
        let config = rna_config(3);
        let zeros = |request: FitRequest| -> Result<Vec<f32>, FitError> {
            let shape = AlignmentShape::new(request.sequence_length, request.num_states).unwrap();
            Ok(vec![0.0; shape.parameter_count()])
        };
        let err = compute_sorted_fn_apc(&config, &zeros, &ProgressReporter::new()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::DegenerateInput);
    }

    #[test]
    fn reports_phases_in_pipeline_order() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            if let Progress::PhaseStart { name } = event {
                sink.lock().unwrap().push(name);
            }
        }));

        compute_sorted_fn_apc(&rna_config(3), &diagonal_fitter, &reporter).unwrap();
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "Fitting Parameters",
                "Extracting Couplings",
                "Scoring Site Pairs",
                "Average Product Correction"
            ]
        );
    }
}
