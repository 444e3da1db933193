#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub id: String,
    pub sequence: String,
}

/// A multiple sequence alignment whose records all share one length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    records: Vec<SequenceRecord>,
    sequence_length: usize,
}

impl Alignment {
    /// Caller guarantees `records` is non-empty and every sequence has `sequence_length` columns.
    pub(crate) fn from_validated(records: Vec<SequenceRecord>, sequence_length: usize) -> Self {
        Self {
            records,
            sequence_length,
        }
    }

    pub fn records(&self) -> &[SequenceRecord] {
        &self.records
    }

    pub fn num_sequences(&self) -> usize {
        self.records.len()
    }

    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }

    pub fn summary(&self) -> AlignmentSummary {
        AlignmentSummary {
            num_sequences: self.num_sequences(),
            sequence_length: self.sequence_length,
        }
    }
}

/// The only facts about an alignment the score pipeline needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentSummary {
    pub num_sequences: usize,
    pub sequence_length: usize,
}
