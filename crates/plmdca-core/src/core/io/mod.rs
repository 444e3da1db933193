//! # I/O Module
//!
//! Readers and writers at the edges of the score pipeline.
//!
//! - [`fasta`] - Aligned FASTA input, yielding the sequence count and alignment length
//! - [`parameters`] - Fitted parameter arrays stored as little-endian `f32` binary or text
//! - [`score_table`] - Delimited output of sorted pair scores
//! - [`traits`] - The common interface for alignment formats

pub mod fasta;
pub mod parameters;
pub mod score_table;
pub mod traits;
