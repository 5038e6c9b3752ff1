//! Interview engine: question generation, heuristic answer scoring, and the
//! narrative summary. Everything here is pure and deterministic given an
//! injected randomness source, which keeps it fully testable.

pub mod questions;
pub mod scoring;
pub mod summary;
