//! Triangular index algebra for the plmDCA parameter layout.
//!
//! The backend stores `L*q` field values followed by one `q x q` coupling block per
//! unordered site pair `(i, j)`, `i < j`. Blocks are laid out in upper-triangular
//! row order, so the pair `(i, j)` is preceded by
//!
//! ```text
//! L*(L-1)/2 - (L-i)*(L-i-1)/2 + (j-i-1)
//! ```
//!
//! other pairs.

use super::models::score::SitePair;
use super::models::shape::AlignmentShape;
use itertools::Itertools;
use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("Site pair ({i}, {j}) is not upper-triangular (requires i < j)")]
    NotUpperTriangular { i: usize, j: usize },
    #[error("Site index {site} is out of range for an alignment of {num_sites} sites")]
    SiteOutOfRange { site: usize, num_sites: usize },
    #[error("State index {state} is out of range for {num_states} states")]
    StateOutOfRange { state: usize, num_states: usize },
}

/// Number of site pairs preceding `(i, j)` in the enumeration order.
///
/// This is a bijection from `{(i, j) : 0 <= i < j < num_sites}` onto
/// `[0, num_sites*(num_sites-1)/2)`.
pub fn pair_offset(i: usize, j: usize, num_sites: usize) -> Result<usize, IndexError> {
    if i >= j {
        return Err(IndexError::NotUpperTriangular { i, j });
    }
    if j >= num_sites {
        return Err(IndexError::SiteOutOfRange {
            site: j,
            num_sites,
        });
    }
    let total = num_sites * (num_sites - 1) / 2;
    let remaining = (num_sites - i) * (num_sites - i - 1) / 2;
    Ok(total - remaining + (j - i - 1))
}

/// All site pairs of an alignment in enumeration order.
pub fn site_pairs(num_sites: usize) -> impl Iterator<Item = SitePair> + Clone {
    (0..num_sites)
        .tuple_combinations::<(usize, usize)>()
        .map(SitePair::from)
}

/// Maps `(site pair, state pair)` coordinates onto offsets for one alignment shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairIndexer {
    shape: AlignmentShape,
}

impl PairIndexer {
    pub fn new(shape: AlignmentShape) -> Self {
        Self { shape }
    }

    pub fn shape(&self) -> AlignmentShape {
        self.shape
    }

    #[inline]
    pub fn pair_offset(&self, i: usize, j: usize) -> Result<usize, IndexError> {
        pair_offset(i, j, self.shape.num_sites())
    }

    /// Offset of coupling `J_ij(a, b)` in the raw backend array:
    /// `L*q + pair_offset(i, j)*q*q + a*q + b`.
    pub fn flat_index(&self, i: usize, j: usize, a: usize, b: usize) -> Result<usize, IndexError> {
        let q = self.shape.num_states();
        let pair = self.pair_offset(i, j)?;
        check_state(a, q)?;
        check_state(b, q)?;
        Ok(self.shape.field_count() + pair * q * q + a * q + b)
    }

    /// Offset of `J_ij(a, b)` in the gap-free coupling sequence, where every pair
    /// owns a `(q-1) x (q-1)` block and there is no fields prefix.
    pub fn non_gap_index(
        &self,
        i: usize,
        j: usize,
        a: usize,
        b: usize,
    ) -> Result<usize, IndexError> {
        let qm1 = self.shape.num_non_gap_states();
        let pair = self.pair_offset(i, j)?;
        check_state(a, qm1)?;
        check_state(b, qm1)?;
        Ok(pair * qm1 * qm1 + a * qm1 + b)
    }

    pub fn non_gap_block_range(&self, pair: SitePair) -> Result<Range<usize>, IndexError> {
        let block_len = self.shape.non_gap_block_len();
        let start = self.pair_offset(pair.i, pair.j)? * block_len;
        Ok(start..start + block_len)
    }

    pub fn pairs(&self) -> impl Iterator<Item = SitePair> + Clone + use<> {
        site_pairs(self.shape.num_sites())
    }
}

#[inline]
fn check_state(state: usize, num_states: usize) -> Result<(), IndexError> {
    if state >= num_states {
        return Err(IndexError::StateOutOfRange { state, num_states });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indexer(num_sites: usize, num_states: usize) -> PairIndexer {
        PairIndexer::new(AlignmentShape::new(num_sites, num_states).unwrap())
    }

    #[test]
    fn pair_offset_enumerates_rows_of_upper_triangle() {
        assert_eq!(pair_offset(0, 1, 4), Ok(0));
        assert_eq!(pair_offset(0, 2, 4), Ok(1));
        assert_eq!(pair_offset(0, 3, 4), Ok(2));
        assert_eq!(pair_offset(1, 2, 4), Ok(3));
        assert_eq!(pair_offset(1, 3, 4), Ok(4));
        assert_eq!(pair_offset(2, 3, 4), Ok(5));
    }

    #[test]
    fn pair_offset_rejects_invalid_pairs() {
        assert_eq!(
            pair_offset(2, 2, 4),
            Err(IndexError::NotUpperTriangular { i: 2, j: 2 })
        );
        assert_eq!(
            pair_offset(3, 1, 4),
            Err(IndexError::NotUpperTriangular { i: 3, j: 1 })
        );
        assert_eq!(
            pair_offset(1, 4, 4),
            Err(IndexError::SiteOutOfRange {
                site: 4,
                num_sites: 4
            })
        );
    }

    #[test]
    fn site_pairs_follow_pair_offset_order() {
        for (expected, pair) in site_pairs(6).enumerate() {
            assert_eq!(pair_offset(pair.i, pair.j, 6), Ok(expected));
        }
        assert_eq!(site_pairs(6).count(), 15);
    }

    #[test]
    fn flat_index_skips_fields_and_preceding_blocks() {
        let idx = indexer(3, 3);
        assert_eq!(idx.flat_index(0, 1, 0, 0), Ok(9));
        assert_eq!(idx.flat_index(0, 1, 2, 2), Ok(17));
        assert_eq!(idx.flat_index(0, 2, 0, 0), Ok(18));
        assert_eq!(idx.flat_index(1, 2, 1, 2), Ok(27 + 3 + 2));
        assert_eq!(idx.flat_index(1, 2, 2, 2), Ok(35));
    }

    #[test]
    fn flat_index_covers_the_coupling_region_exactly() {
        let idx = indexer(5, 4);
        let shape = idx.shape();
        let mut offsets = Vec::new();
        for pair in idx.pairs() {
            for a in 0..4 {
                for b in 0..4 {
                    offsets.push(idx.flat_index(pair.i, pair.j, a, b).unwrap());
                }
            }
        }
        let expected: Vec<usize> = (shape.field_count()..shape.parameter_count()).collect();
        assert_eq!(offsets, expected);
    }

    #[test]
    fn flat_index_rejects_out_of_range_states() {
        let idx = indexer(3, 5);
        assert_eq!(
            idx.flat_index(0, 1, 5, 0),
            Err(IndexError::StateOutOfRange {
                state: 5,
                num_states: 5
            })
        );
        assert!(idx.flat_index(0, 1, 4, 4).is_ok());
    }

    #[test]
    fn non_gap_index_excludes_gap_state() {
        let idx = indexer(3, 3);
        assert_eq!(idx.non_gap_index(0, 1, 0, 0), Ok(0));
        assert_eq!(idx.non_gap_index(0, 1, 1, 1), Ok(3));
        assert_eq!(idx.non_gap_index(1, 2, 1, 0), Ok(10));
        assert_eq!(
            idx.non_gap_index(0, 1, 2, 0),
            Err(IndexError::StateOutOfRange {
                state: 2,
                num_states: 2
            })
        );
    }

    #[test]
    fn pair_iterator_outlives_its_indexer() {
        let pairs = PairIndexer::new(AlignmentShape::new(4, 3).unwrap()).pairs();
        let collected: Vec<_> = pairs.map(|p| (p.i, p.j)).collect();
        assert_eq!(collected, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn non_gap_block_range_is_contiguous_per_pair() {
        let idx = indexer(4, 21);
        assert_eq!(idx.non_gap_block_range(SitePair::new(0, 1)), Ok(0..400));
        assert_eq!(idx.non_gap_block_range(SitePair::new(2, 3)), Ok(2000..2400));
    }
}
