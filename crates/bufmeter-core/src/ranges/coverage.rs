//! "Fully buffered" classification.

use super::MergedRangeSet;

/// True if the merged ranges cover at least `duration - epsilon` seconds.
///
/// Empty input and non-positive or non-finite durations are never fully covered.
pub fn is_fully_covered(merged: &MergedRangeSet, duration: f64, epsilon: f64) -> bool {
    if merged.is_empty() || !duration.is_finite() || duration <= 0.0 {
        return false;
    }
    merged.covered_secs() >= duration - epsilon
}
