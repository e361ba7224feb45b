//! Host signals and what handling them produced.

use crate::progress::ProgressStep;
use crate::record::BufferData;

/// Ways a page can go away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageExit {
    PageHide,
    Unload,
    VisibilityHidden,
}

/// Signals the host dispatches to a tracker, one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// More media data was buffered.
    Progress,
    /// Playback position changed.
    TimeUpdate,
    PageExit(PageExit),
}

/// Result of one finalize attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// Not tracking, size or duration unknown, or already finalized.
    Skipped,
    /// Another finalize is still delivering; this trigger was dropped.
    InFlight,
    /// Nothing new since the last successful emission.
    NothingToSend,
    Delivered(BufferData),
    /// At least one sink failed; under the default policy the delta stays pending.
    DeliveryFailed(BufferData),
}

impl FinalizeOutcome {
    /// The record that was handed to the sinks, if any.
    pub fn record(&self) -> Option<&BufferData> {
        match self {
            FinalizeOutcome::Delivered(d) | FinalizeOutcome::DeliveryFailed(d) => Some(d),
            _ => None,
        }
    }
}

/// Result of handling one [`Signal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalOutcome {
    /// Not tracking, or the signal did not apply (e.g. far from the end).
    Ignored,
    Progress(ProgressStep),
    Finalize(FinalizeOutcome),
}
