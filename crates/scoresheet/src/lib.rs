//! Scoring engine for campus journalist candidate evaluations.
//!
//! The crate owns the rubric lookup tables, the per-candidate scoring state, and the
//! submission workflow that validates, de-duplicates, and hands finished records to an
//! external store.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
