//! Time-range normalization and coverage.
//!
//! Raw buffered ranges reported by a player are filtered, sorted and merged
//! into a [`MergedRangeSet`] before any byte estimation happens. The same
//! epsilon drives both merging and the "fully buffered" decision.

mod coverage;
mod merge;
mod time_range;

pub use coverage::is_fully_covered;
pub use merge::{merge, MergedRangeSet};
pub use time_range::{well_formed, TimeRange};
