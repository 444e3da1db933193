use super::score::SitePair;
use super::shape::AlignmentShape;
use crate::core::indexing::{IndexError, PairIndexer};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParameterError {
    #[error("{kind} size mismatch: expected {expected} values, got {actual}")]
    LengthMismatch {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Fields and couplings exactly as returned by the fitting backend.
///
/// Coupling extraction takes this by value and frees it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawParameters {
    shape: AlignmentShape,
    values: Vec<f32>,
}

impl RawParameters {
    pub fn new(shape: AlignmentShape, values: Vec<f32>) -> Result<Self, ParameterError> {
        let expected = shape.parameter_count();
        if values.len() != expected {
            return Err(ParameterError::LengthMismatch {
                kind: "Fields and couplings",
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { shape, values })
    }

    pub fn shape(&self) -> AlignmentShape {
        self.shape
    }

    #[inline]
    pub fn get(&self, flat_index: usize) -> Option<f32> {
        self.values.get(flat_index).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Couplings with every gap state removed: one `(q-1) x (q-1)` row-major block per
/// site pair, in pair enumeration order.
#[derive(Debug, Clone, PartialEq)]
pub struct NonGapCouplings {
    shape: AlignmentShape,
    values: Vec<f32>,
}

impl NonGapCouplings {
    pub fn new(shape: AlignmentShape, values: Vec<f32>) -> Result<Self, ParameterError> {
        let expected = shape.non_gap_coupling_count();
        if values.len() != expected {
            return Err(ParameterError::LengthMismatch {
                kind: "Non-gap couplings",
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { shape, values })
    }

    pub fn shape(&self) -> AlignmentShape {
        self.shape
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn block(&self, pair: SitePair) -> Result<&[f32], IndexError> {
        let range = PairIndexer::new(self.shape).non_gap_block_range(pair)?;
        Ok(&self.values[range])
    }

    pub fn blocks(&self) -> impl Iterator<Item = (SitePair, &[f32])> {
        PairIndexer::new(self.shape)
            .pairs()
            .zip(self.values.chunks_exact(self.shape.non_gap_block_len()))
    }
}
