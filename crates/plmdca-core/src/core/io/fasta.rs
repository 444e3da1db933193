use super::traits::AlignmentFile;
use crate::core::models::alignment::{Alignment, SequenceRecord};
use needletail::errors::ParseError;
use needletail::parse_fastx_reader;
use std::io::{self, BufRead, Cursor};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed FASTA: {0}")]
    Parse(#[from] ParseError),
    #[error("Record '{id}' has no sequence data")]
    EmptySequence { id: String },
    #[error("Alignment contains no sequences")]
    EmptyAlignment,
    #[error("Record '{id}' has length {found}, but the alignment length is {expected}")]
    LengthMismatch {
        id: String,
        expected: usize,
        found: usize,
    },
}

/// Aligned FASTA, parsed with `needletail`.
///
/// Blank lines and `;` comment lines are dropped before parsing. Residues are
/// counted, not validated.
pub struct FastaFile;

impl AlignmentFile for FastaFile {
    type Error = FastaError;

    fn read_from(reader: &mut impl BufRead) -> Result<Alignment, Self::Error> {
        let mut content = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(';') {
                continue;
            }
            content.extend_from_slice(trimmed.as_bytes());
            content.push(b'\n');
        }
        if content.is_empty() {
            return Err(FastaError::EmptyAlignment);
        }

        let mut fastx = parse_fastx_reader(Cursor::new(content))?;
        let mut records = Vec::new();
        while let Some(record) = fastx.next() {
            let record = record?;
            let id = String::from_utf8_lossy(record.id()).trim().to_string();
            let sequence: String = String::from_utf8_lossy(&record.seq())
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            if sequence.is_empty() {
                return Err(FastaError::EmptySequence { id });
            }
            records.push(SequenceRecord { id, sequence });
        }

        let sequence_length = records
            .first()
            .map(|r| r.sequence.chars().count())
            .ok_or(FastaError::EmptyAlignment)?;

        if let Some(bad) = records
            .iter()
            .find(|r| r.sequence.chars().count() != sequence_length)
        {
            return Err(FastaError::LengthMismatch {
                id: bad.id.clone(),
                expected: sequence_length,
                found: bad.sequence.chars().count(),
            });
        }

        Ok(Alignment::from_validated(records, sequence_length))
    }
}
