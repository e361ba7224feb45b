//! Sort-and-sweep merge of buffered time ranges.

use super::TimeRange;

/// Sorted, disjoint ranges with no gap of `epsilon` or less between neighbours.
///
/// Only [`merge`] builds one, so the invariant holds for every instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedRangeSet {
    ranges: Vec<TimeRange>,
}

impl MergedRangeSet {
    pub fn ranges(&self) -> &[TimeRange] {
        &self.ranges
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeRange> {
        self.ranges.iter()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// End of the last (furthest) range, if any.
    pub fn last_end(&self) -> Option<f64> {
        self.ranges.last().map(|r| r.end)
    }

    /// Total buffered seconds across all ranges.
    pub fn covered_secs(&self) -> f64 {
        self.ranges.iter().map(TimeRange::len_secs).sum()
    }
}

/// Merges `ranges` into a [`MergedRangeSet`].
///
/// Ranges whose start lies at most `epsilon` past the current end are folded
/// into it (the comparison is inclusive). Input must already be well formed;
/// see [`super::well_formed`].
pub fn merge(ranges: &[TimeRange], epsilon: f64) -> MergedRangeSet {
    let mut sorted = ranges.to_vec();
    sorted.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut out: Vec<TimeRange> = Vec::with_capacity(sorted.len());
    for range in sorted {
        match out.last_mut() {
            Some(current) if range.start - current.end <= epsilon => {
                current.end = current.end.max(range.end);
            }
            _ => out.push(range),
        }
    }

    MergedRangeSet { ranges: out }
}
