//! # Workflows Module
//!
//! Top-level entry points of the library. A workflow takes a validated
//! [`AnalysisConfig`](crate::engine::config::AnalysisConfig), a
//! [`ParameterFitter`](crate::engine::fitter::ParameterFitter) and a progress reporter,
//! and runs the whole pipeline:
//!
//! ```text
//! fit -> raw parameters -> non-gap couplings -> Frobenius scores -> APC scores
//! ```
//!
//! - **Score Workflow** ([`score`]) - `compute_sorted_fn` and `compute_sorted_fn_apc`

pub mod score;
