//! Append-only experiment log and its tabular export contract.
//!
//! One `SamplingResult` is appended per completed run; insertion order is
//! completion order and is never reshuffled. The only mutations are `append`
//! and an explicit `clear`. Serialization itself lives with the host (the
//! CLI writes CSV); this module fixes the record shape and column order.

use crate::sampler::SamplingResult;

/// Column names and order of the export contract. Each logged record yields
/// exactly these six scalars, in this order.
pub const COLUMNS: [&str; 6] = [
    "n",
    "time_ms",
    "exact_area",
    "mc_area",
    "abs_error",
    "rel_error",
];

/// Ordered, append-only log of completed sampling runs.
#[derive(Clone, Debug, Default)]
pub struct ExperimentLog {
    results: Vec<SamplingResult>,
}

impl ExperimentLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the end of the log; cannot fail.
    pub fn append(&mut self, result: SamplingResult) {
        self.results.push(result);
    }

    /// Drop all recorded results.
    pub fn clear(&mut self) {
        self.results.clear();
    }

    /// Read-only view in insertion order.
    #[inline]
    pub fn all(&self) -> &[SamplingResult] {
        &self.results
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.results.len()
    }
}
