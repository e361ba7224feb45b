//! The record handed to emission sinks.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Bytes downloaded since the previous successful emission, for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferData {
    pub bytes: u64,
    pub resource_url: String,
    /// Milliseconds since the Unix epoch at construction.
    pub timestamp_ms: u64,
}

impl BufferData {
    /// Stamps a new record with the current wall-clock time.
    pub fn new(bytes: u64, resource_url: impl Into<String>) -> Self {
        Self {
            bytes,
            resource_url: resource_url.into(),
            timestamp_ms: now_ms(),
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_pipeline_field_names() {
        let data = BufferData {
            bytes: 1234,
            resource_url: "https://cdn.example.com/a.mp4".to_string(),
            timestamp_ms: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["bytes"], 1234);
        assert_eq!(json["resourceUrl"], "https://cdn.example.com/a.mp4");
        assert_eq!(json["timestampMs"], 1_700_000_000_000u64);
    }

    #[test]
    fn new_stamps_current_time() {
        let data = BufferData::new(1, "https://cdn.example.com/a.mp4");
        assert!(data.timestamp_ms > 1_600_000_000_000);
    }
}
