//! Byte range type and time-to-byte conversion.

use crate::ranges::TimeRange;

/// A byte range `[start, end]` (inclusive on both ends).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte offset.
    pub start: u64,
    /// Last byte offset (inclusive).
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes in the range: `end - start + 1`.
    ///
    /// Every byte total in the crate goes through this method.
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start).saturating_add(1)
    }
}

/// Byte offset for time `t`, floored and clamped to `[0, total_size - 1]`.
fn byte_offset(t: f64, duration: f64, total_size: u64) -> u64 {
    let last = total_size - 1;
    let raw = (t / duration * total_size as f64).floor();
    if raw.is_nan() || raw <= 0.0 {
        return 0;
    }
    // `as` saturates for values beyond u64::MAX.
    (raw as u64).min(last)
}

/// Converts the time span `[start, end]` to a byte range.
///
/// Returns `None` when `duration` is not positive, `total_size` is zero, or the
/// span collapses to a single offset after flooring. None of these is an error.
pub fn time_to_byte_range(start: f64, end: f64, duration: f64, total_size: u64) -> Option<ByteRange> {
    if !duration.is_finite() || duration <= 0.0 || total_size == 0 {
        return None;
    }
    let start_byte = byte_offset(start, duration, total_size);
    let end_byte = byte_offset(end, duration, total_size);
    if end_byte <= start_byte {
        return None;
    }
    Some(ByteRange {
        start: start_byte,
        end: end_byte,
    })
}

/// Sums the byte widths of all ranges that convert; the rest contribute zero.
pub fn calculate_total_bytes<'a>(
    ranges: impl IntoIterator<Item = &'a TimeRange>,
    duration: f64,
    total_size: u64,
) -> u64 {
    ranges
        .into_iter()
        .filter_map(|r| time_to_byte_range(r.start, r.end, duration, total_size))
        .map(|b| b.len())
        .fold(0u64, u64::saturating_add)
}
