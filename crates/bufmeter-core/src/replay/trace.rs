//! Trace file format.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::ranges::TimeRange;

/// One recorded playback session.
#[derive(Debug, Clone, Deserialize)]
pub struct Trace {
    pub url: String,
    /// Duration in seconds; omit to replay a player without metadata.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Known total size; when omitted the size must come from a resolver.
    #[serde(default)]
    pub total_size: Option<u64>,
    #[serde(default)]
    pub events: Vec<TraceEvent>,
}

/// A host signal together with the media state at that moment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TraceEvent {
    /// Buffered ranges changed; each range is `[start, end]`.
    Progress { ranges: Vec<[f64; 2]> },
    /// Playback position moved to `time`.
    TimeUpdate { time: f64 },
    PageHide,
    Unload,
    VisibilityHidden,
}

impl TraceEvent {
    /// Ranges carried by a progress event, as [`TimeRange`] values (unchecked).
    pub fn time_ranges(&self) -> Option<Vec<TimeRange>> {
        match self {
            TraceEvent::Progress { ranges } => Some(
                ranges
                    .iter()
                    .map(|&[start, end]| TimeRange { start, end })
                    .collect(),
            ),
            _ => None,
        }
    }
}

impl Trace {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parse trace")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data =
            fs::read_to_string(path).with_context(|| format!("read trace: {}", path.display()))?;
        Self::from_toml_str(&data).with_context(|| format!("trace file: {}", path.display()))
    }
}
