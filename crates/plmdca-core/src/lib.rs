//! # plmDCA Score Library
//!
//! Turns the flat parameter array of a pseudo-likelihood maximization DCA backend
//! into ranked interaction scores between alignment sites.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Immutable data models (`AlignmentShape`, `RawParameters`,
//!   `NonGapCouplings`, `PairScore`), the triangular index algebra shared by every
//!   component ([`core::indexing`]) and file I/O for alignments, parameter arrays and
//!   score tables.
//!
//! - **[`engine`]: The Logic Core.** Configuration, the injected parameter fitter, error
//!   taxonomy, progress reporting and the computational tasks (coupling extraction,
//!   gauge-fixed Frobenius scoring, average product correction).
//!
//! - **[`workflows`]: The Public API.** `compute_sorted_fn` and `compute_sorted_fn_apc`,
//!   which run the full pipeline from fitted parameters to sorted scores.

pub mod core;
pub mod engine;
pub mod workflows;
