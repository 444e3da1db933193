//! # Engine Module
//!
//! Turns a fitted parameter array into pair scores.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Biomolecule, alignment and backend hyperparameters
//! - **Parameter Fitting** ([`fitter`]) - The injected backend producing fields and couplings
//! - **Progress Monitoring** ([`progress`]) - Phase and task events for front-ends
//! - **Error Handling** ([`error`]) - The engine error taxonomy
//! - **Tasks** (`tasks`) - Coupling extraction, Frobenius scoring and average product correction
//!
//! Every task is a pure function over immutable inputs. Per-pair scoring runs on
//! rayon's pool when the `parallel` feature is enabled; results are identical either way.

pub mod config;
pub mod error;
pub mod fitter;
pub mod progress;
pub(crate) mod tasks;
