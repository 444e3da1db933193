use crate::core::indexing::PairIndexer;
use crate::core::models::parameters::NonGapCouplings;
use crate::core::models::score::{PairScore, SitePair, sort_descending};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use nalgebra::DMatrix;
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Scores every site pair by the Frobenius norm of its zero-sum gauged coupling block.
///
/// Returns all `L*(L-1)/2` pairs sorted by descending score.
#[instrument(skip_all, name = "frobenius_score_task")]
pub fn run(
    couplings: &NonGapCouplings,
    reporter: &ProgressReporter,
) -> Result<Vec<PairScore>, EngineError> {
    let shape = couplings.shape();
    let dim = shape.num_non_gap_states();
    let pairs: Vec<SitePair> = PairIndexer::new(shape).pairs().collect();

    reporter.report(Progress::TaskStart {
        total_steps: pairs.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = pairs.iter();

    #[cfg(feature = "parallel")]
    let iterator = pairs.par_iter();

    let mut scores = iterator
        .map(|&pair| -> Result<PairScore, EngineError> {
            let block = couplings.block(pair)?;
            let score = gauge_fixed_frobenius_norm(block, dim)?;
            reporter.report(Progress::TaskIncrement { amount: 1 });
            Ok(PairScore { pair, score })
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    reporter.report(Progress::TaskFinish);

    sort_descending(&mut scores);
    info!(pairs = scores.len(), "Computed Frobenius norm scores.");
    Ok(scores)
}

/// Frobenius norm of a row-major `dim x dim` block after the zero-sum gauge transform.
pub fn gauge_fixed_frobenius_norm(block: &[f32], dim: usize) -> Result<f64, EngineError> {
    if block.len() != dim * dim {
        return Err(EngineError::InternalConsistency(format!(
            "coupling block has {} values, expected {}x{}",
            block.len(),
            dim,
            dim
        )));
    }
    let matrix = DMatrix::from_fn(dim, dim, |a, b| f64::from(block[a * dim + b]));
    Ok(zero_sum_gauge(&matrix).norm())
}

/// `C[a,b] - mean(row a) - mean(column b) + mean(C)`.
///
/// Every row and column of the result sums to zero, so adding any `r[a] + c[b]`
/// to the input leaves the output unchanged.
pub fn zero_sum_gauge(matrix: &DMatrix<f64>) -> DMatrix<f64> {
    let row_means = matrix.column_mean();
    let col_means = matrix.row_mean();
    let mean = matrix.mean();
    DMatrix::from_fn(matrix.nrows(), matrix.ncols(), |a, b| {
        matrix[(a, b)] - row_means[a] - col_means[b] + mean
    })
}
