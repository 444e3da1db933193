use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of states per site for protein alignments (20 amino acids plus the gap).
pub const PROTEIN_NUM_STATES: usize = 21;
/// Number of states per site for RNA alignments (4 nucleotides plus the gap).
pub const RNA_NUM_STATES: usize = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("An alignment needs at least 2 sites to form a site pair, got {0}")]
    TooFewSites(usize),
    #[error("At least 2 states per site are required (one of them the gap state), got {0}")]
    TooFewStates(usize),
    #[error("Invalid biomolecule type '{0}' (expected 'protein' or 'rna')")]
    UnknownBiomolecule(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Biomolecule {
    Protein,
    Rna,
}

impl Biomolecule {
    pub fn num_states(self) -> usize {
        match self {
            Biomolecule::Protein => PROTEIN_NUM_STATES,
            Biomolecule::Rna => RNA_NUM_STATES,
        }
    }

    /// Integer tag the fitting backend uses to select its alphabet.
    pub fn backend_code(self) -> u16 {
        match self {
            Biomolecule::Protein => 1,
            Biomolecule::Rna => 2,
        }
    }
}

impl FromStr for Biomolecule {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PROTEIN" => Ok(Biomolecule::Protein),
            "RNA" => Ok(Biomolecule::Rna),
            _ => Err(ShapeError::UnknownBiomolecule(s.trim().to_string())),
        }
    }
}

impl fmt::Display for Biomolecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Biomolecule::Protein => write!(f, "PROTEIN"),
            Biomolecule::Rna => write!(f, "RNA"),
        }
    }
}

/// Dimensions of one analysis run: `L` sites with `q` states each.
///
/// The last state, `q - 1`, is always the gap state. Every size used by the
/// parameter layout is derived from these two numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlignmentShape {
    num_sites: usize,
    num_states: usize,
}

impl AlignmentShape {
    pub fn new(num_sites: usize, num_states: usize) -> Result<Self, ShapeError> {
        if num_sites < 2 {
            return Err(ShapeError::TooFewSites(num_sites));
        }
        if num_states < 2 {
            return Err(ShapeError::TooFewStates(num_states));
        }
        Ok(Self {
            num_sites,
            num_states,
        })
    }

    pub fn for_biomolecule(biomolecule: Biomolecule, num_sites: usize) -> Result<Self, ShapeError> {
        Self::new(num_sites, biomolecule.num_states())
    }

    #[inline]
    pub fn num_sites(&self) -> usize {
        self.num_sites
    }

    #[inline]
    pub fn num_states(&self) -> usize {
        self.num_states
    }

    #[inline]
    pub fn gap_state(&self) -> usize {
        self.num_states - 1
    }

    #[inline]
    pub fn num_non_gap_states(&self) -> usize {
        self.num_states - 1
    }

    /// `L * (L - 1) / 2`
    #[inline]
    pub fn num_pairs(&self) -> usize {
        self.num_sites * (self.num_sites - 1) / 2
    }

    #[inline]
    pub fn field_count(&self) -> usize {
        self.num_sites * self.num_states
    }

    #[inline]
    pub fn coupling_block_len(&self) -> usize {
        self.num_states * self.num_states
    }

    #[inline]
    pub fn non_gap_block_len(&self) -> usize {
        self.num_non_gap_states() * self.num_non_gap_states()
    }

    /// Length of the array returned by the fitting backend: `L*q + (L*(L-1)/2)*q*q`.
    pub fn parameter_count(&self) -> usize {
        self.field_count() + self.num_pairs() * self.coupling_block_len()
    }

    pub fn non_gap_coupling_count(&self) -> usize {
        self.num_pairs() * self.non_gap_block_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_biomolecule_case_insensitively() {
        assert_eq!(" protein ".parse::<Biomolecule>(), Ok(Biomolecule::Protein));
        assert_eq!("Rna".parse::<Biomolecule>(), Ok(Biomolecule::Rna));
        assert_eq!(
            "dna".parse::<Biomolecule>(),
            Err(ShapeError::UnknownBiomolecule("dna".to_string()))
        );
    }

    #[test]
    fn biomolecule_determines_state_count_and_backend_code() {
        assert_eq!(Biomolecule::Protein.num_states(), 21);
        assert_eq!(Biomolecule::Rna.num_states(), 5);
        assert_eq!(Biomolecule::Protein.backend_code(), 1);
        assert_eq!(Biomolecule::Rna.backend_code(), 2);
        assert_eq!(Biomolecule::Rna.to_string(), "RNA");
    }

    #[test]
    fn rejects_degenerate_shapes() {
        assert_eq!(AlignmentShape::new(1, 21), Err(ShapeError::TooFewSites(1)));
        assert_eq!(AlignmentShape::new(0, 5), Err(ShapeError::TooFewSites(0)));
        assert_eq!(AlignmentShape::new(4, 1), Err(ShapeError::TooFewStates(1)));
    }

    #[test]
    fn derived_sizes_match_parameter_layout() {
        let shape = AlignmentShape::new(3, 3).unwrap();
        assert_eq!(shape.num_pairs(), 3);
        assert_eq!(shape.field_count(), 9);
        assert_eq!(shape.parameter_count(), 36);
        assert_eq!(shape.gap_state(), 2);
        assert_eq!(shape.non_gap_block_len(), 4);
        assert_eq!(shape.non_gap_coupling_count(), 12);
    }

    #[test]
    fn protein_parameter_count_for_typical_length() {
        let shape = AlignmentShape::for_biomolecule(Biomolecule::Protein, 10).unwrap();
        assert_eq!(shape.parameter_count(), 10 * 21 + 45 * 441);
        assert_eq!(shape.non_gap_coupling_count(), 45 * 400);
    }
}
