//! One-shot analysis of a buffered range set.

use crate::ranges::{self, MergedRangeSet, TimeRange};

use super::calculate_total_bytes;

/// Snapshot of what a set of buffered ranges amounts to.
#[derive(Debug, Clone)]
pub struct EstimateReport {
    pub merged: MergedRangeSet,
    pub covered_secs: f64,
    pub duration_secs: f64,
    pub estimated_bytes: u64,
    pub total_size_bytes: u64,
    pub fully_covered: bool,
}

impl EstimateReport {
    /// Filters, merges and converts `ranges` in one pass.
    pub fn analyze(ranges: &[TimeRange], duration: f64, total_size: u64, epsilon: f64) -> Self {
        let merged = ranges::merge(&ranges::well_formed(ranges.iter().copied()), epsilon);
        let covered_secs = merged.covered_secs();
        let fully_covered = ranges::is_fully_covered(&merged, duration, epsilon);
        let estimated_bytes = calculate_total_bytes(merged.iter(), duration, total_size);
        Self {
            merged,
            covered_secs,
            duration_secs: duration,
            estimated_bytes,
            total_size_bytes: total_size,
            fully_covered,
        }
    }

    /// Buffered fraction of the duration in [0.0, 1.0].
    pub fn coverage_fraction(&self) -> f64 {
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return 0.0;
        }
        (self.covered_secs / self.duration_secs).clamp(0.0, 1.0)
    }
}
