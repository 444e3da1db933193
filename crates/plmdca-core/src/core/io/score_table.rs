use crate::core::models::score::PairScore;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoreTableError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to write score row: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreTableOptions {
    pub delimiter: u8,
    /// Report sites starting from 1 instead of 0.
    pub one_based: bool,
    /// Keep only the first `n` rows of the (already sorted) scores.
    pub limit: Option<usize>,
}

impl Default for ScoreTableOptions {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            one_based: false,
            limit: None,
        }
    }
}

#[derive(Serialize)]
struct ScoreRow {
    site_i: usize,
    site_j: usize,
    score: f64,
}

pub fn write_scores<W: Write>(
    scores: &[PairScore],
    writer: W,
    options: &ScoreTableOptions,
) -> Result<(), ScoreTableError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(writer);
    let offset = usize::from(options.one_based);
    let limit = options.limit.unwrap_or(scores.len());

    for entry in scores.iter().take(limit) {
        csv_writer.serialize(ScoreRow {
            site_i: entry.pair.i + offset,
            site_j: entry.pair.j + offset,
            score: entry.score,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_scores_to_path<P: AsRef<Path>>(
    scores: &[PairScore],
    path: P,
    options: &ScoreTableOptions,
) -> Result<(), ScoreTableError> {
    let file = File::create(path)?;
    write_scores(scores, io::BufWriter::new(file), options)
}
