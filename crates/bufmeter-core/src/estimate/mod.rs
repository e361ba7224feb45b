//! Linear time-to-byte estimation.
//!
//! Maps buffered playback time onto byte offsets of the resource assuming a
//! constant bitrate: `byte = floor(t / duration * total_size)`. This avoids any
//! extra ranged request at the cost of accuracy on variable-bitrate media.

mod byte_range;
mod report;

pub use byte_range::{calculate_total_bytes, time_to_byte_range, ByteRange};
pub use report::EstimateReport;
