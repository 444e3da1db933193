//! Computational steps of the score pipeline, in data-flow order.
//!
//! Each task takes the previous task's output by value or reference and validates
//! its size invariants before returning.

pub mod apc;
pub mod extraction;
pub mod frobenius;
