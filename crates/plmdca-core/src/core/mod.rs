//! # Core Module
//!
//! Stateless building blocks of the score pipeline.
//!
//! - **Data Models** ([`models`]) - Alignment shape, parameter arrays, site pairs and scores
//! - **Index Algebra** ([`indexing`]) - Mapping between `(i, j, a, b)` coordinates and flat offsets
//! - **File I/O** ([`io`]) - FASTA alignments, backend parameter files and score tables
//!
//! Nothing in this module knows about fitting or progress reporting; everything here is a
//! pure function of its inputs.

pub mod indexing;
pub mod io;
pub mod models;
