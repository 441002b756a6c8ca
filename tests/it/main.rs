//! Single test binary entry point.
//!
//! Consolidates the integration tests into one binary so the crate links
//! once instead of per test file.
//!
//! Structure:
//! - pipeline: file bytes through parsing, profiling and suggestion
//! - visualization: session flows (re-encoding, filtering, replacement)

mod pipeline;
mod visualization;
