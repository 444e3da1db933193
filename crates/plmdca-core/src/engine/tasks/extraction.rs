use crate::core::indexing::PairIndexer;
use crate::core::models::parameters::{NonGapCouplings, RawParameters};
use crate::engine::error::EngineError;
use tracing::{debug, instrument};

/// Projects the raw backend array onto the gap-free coupling sequence.
///
/// For every site pair in enumeration order, and every `(a, b)` with `a, b < q - 1`
/// in row-major order, the value at `flat_index(i, j, a, b)` is appended. The raw
/// array is consumed and freed before the projection is returned.
#[instrument(skip_all, name = "coupling_extraction_task")]
pub fn run(parameters: RawParameters) -> Result<NonGapCouplings, EngineError> {
    let shape = parameters.shape();
    let indexer = PairIndexer::new(shape);
    let qm1 = shape.num_non_gap_states();

    let mut couplings = Vec::with_capacity(shape.non_gap_coupling_count());
    for pair in indexer.pairs() {
        for a in 0..qm1 {
            for b in 0..qm1 {
                let k = indexer.flat_index(pair.i, pair.j, a, b)?;
                let value = parameters.get(k).ok_or_else(|| {
                    EngineError::InternalConsistency(format!(
                        "flat index {} for pair {} is past the end of {} parameters",
                        k,
                        pair,
                        parameters.len()
                    ))
                })?;
                couplings.push(value);
            }
        }
    }
    drop(parameters);

    debug!(
        pairs = shape.num_pairs(),
        values = couplings.len(),
        "Extracted non-gap couplings."
    );
    Ok(NonGapCouplings::new(shape, couplings)?)
}
