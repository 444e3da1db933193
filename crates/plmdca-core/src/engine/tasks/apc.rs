use crate::core::indexing::pair_offset;
use crate::core::models::score::{PairScore, sort_descending};
use crate::core::models::shape::ShapeError;
use crate::engine::error::EngineError;
use tracing::{info, instrument};

/// Applies the average product correction to a complete set of raw pair scores.
///
/// Each score becomes `score - avg[i] * avg[j] / global`, where `avg[s]` is the
/// mean raw score of the `L - 1` pairs containing site `s` and `global` is the mean
/// of all `avg[s]`. The result is re-sorted by descending corrected score.
#[instrument(skip_all, name = "apc_task")]
pub fn run(raw_scores: &[PairScore], num_sites: usize) -> Result<Vec<PairScore>, EngineError> {
    let site_averages = site_averages(raw_scores, num_sites)?;
    let global_average = site_averages.iter().sum::<f64>() / num_sites as f64;

    if global_average == 0.0 || !global_average.is_finite() {
        return Err(EngineError::DegenerateInput(format!(
            "average raw score over all sites is {}, the correction is undefined",
            global_average
        )));
    }

    let mut corrected: Vec<PairScore> = raw_scores
        .iter()
        .map(|entry| PairScore {
            pair: entry.pair,
            score: entry.score
                - site_averages[entry.pair.i] * site_averages[entry.pair.j] / global_average,
        })
        .collect();
    sort_descending(&mut corrected);

    info!(
        pairs = corrected.len(),
        global_average, "Applied average product correction."
    );
    Ok(corrected)
}

/// Mean raw score of the pairs containing each site.
///
/// `raw_scores` must hold every unordered pair over `num_sites` sites exactly once,
/// in any order.
pub fn site_averages(raw_scores: &[PairScore], num_sites: usize) -> Result<Vec<f64>, EngineError> {
    if num_sites < 2 {
        return Err(ShapeError::TooFewSites(num_sites).into());
    }
    let num_pairs = num_sites * (num_sites - 1) / 2;
    if raw_scores.len() != num_pairs {
        return Err(EngineError::InternalConsistency(format!(
            "expected {} pair scores for {} sites, got {}",
            num_pairs,
            num_sites,
            raw_scores.len()
        )));
    }

    let mut seen = vec![false; num_pairs];
    let mut sums = vec![0.0f64; num_sites];
    let mut counts = vec![0usize; num_sites];

    for entry in raw_scores {
        let offset = pair_offset(entry.pair.i, entry.pair.j, num_sites)?;
        if std::mem::replace(&mut seen[offset], true) {
            return Err(EngineError::InternalConsistency(format!(
                "pair {} appears more than once",
                entry.pair
            )));
        }
        for site in [entry.pair.i, entry.pair.j] {
            sums[site] += entry.score;
            counts[site] += 1;
        }
    }

    sums.iter()
        .zip(&counts)
        .enumerate()
        .map(|(site, (&sum, &count))| {
            if count != num_sites - 1 {
                return Err(EngineError::InternalConsistency(format!(
                    "site {} has {} pair scores, expected {}",
                    site,
                    count,
                    num_sites - 1
                )));
            }
            Ok(sum / count as f64)
        })
        .collect()
}
