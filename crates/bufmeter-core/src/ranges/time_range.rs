//! A single buffered span of playback time.

use serde::{Deserialize, Serialize};

/// Buffered span `[start, end]` in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start time in seconds (>= 0).
    pub start: f64,
    /// End time in seconds (> start).
    pub end: f64,
}

impl TimeRange {
    /// Builds a range, returning `None` for negative, non-finite or degenerate spans.
    pub fn new(start: f64, end: f64) -> Option<Self> {
        let range = Self { start, end };
        range.is_well_formed().then_some(range)
    }

    /// True if both bounds are finite, `start >= 0` and `end > start`.
    pub fn is_well_formed(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start >= 0.0 && self.end > self.start
    }

    /// Length in seconds (0 for malformed ranges).
    pub fn len_secs(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// Drops ranges the merger must never see (degenerate, negative, NaN).
pub fn well_formed(ranges: impl IntoIterator<Item = TimeRange>) -> Vec<TimeRange> {
    ranges.into_iter().filter(TimeRange::is_well_formed).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_degenerate_and_negative() {
        assert!(TimeRange::new(0.0, 10.0).is_some());
        assert!(TimeRange::new(5.0, 5.0).is_none());
        assert!(TimeRange::new(6.0, 5.0).is_none());
        assert!(TimeRange::new(-1.0, 5.0).is_none());
        assert!(TimeRange::new(0.0, f64::NAN).is_none());
        assert!(TimeRange::new(0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn well_formed_filters_bad_input() {
        let raw = vec![
            TimeRange { start: 0.0, end: 1.0 },
            TimeRange { start: 2.0, end: 2.0 },
            TimeRange { start: 3.0, end: 1.0 },
            TimeRange { start: 4.0, end: 5.5 },
        ];
        let kept = well_formed(raw);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1].start, 4.0);
        assert!((kept[1].len_secs() - 1.5).abs() < 1e-9);
    }
}
