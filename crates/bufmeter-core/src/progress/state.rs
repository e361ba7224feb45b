//! Long-lived estimation state for one tracked resource.

/// Lifecycle phase of a tracking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Before setup or after teardown.
    Idle,
    /// Listening for signals and estimating.
    Tracking,
    /// Everything was reported; terminal until the next setup.
    Finalized,
}

/// The resource being tracked. Fixed for the session once the size resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceProfile {
    pub url: String,
    /// `None` until the size probe succeeds; byte math is skipped meanwhile.
    pub total_size_bytes: Option<u64>,
}

/// Mutable counters for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressState {
    /// Running estimate; a delta against the baseline once an emission is pending.
    pub estimated_bytes: u64,
    /// Bytes already reported. Only grows, and only after a successful emission.
    pub submitted_baseline_bytes: u64,
    /// Terminal: no further estimation once set.
    pub is_finalized: bool,
    /// Buffered end time at the last evaluation, `-1.0` if none. Throttle marker only.
    pub last_emitted_end_time: f64,
    /// False before start and after destroy; every handler is a no-op then.
    pub is_active: bool,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            estimated_bytes: 0,
            submitted_baseline_bytes: 0,
            is_finalized: false,
            last_emitted_end_time: -1.0,
            is_active: false,
        }
    }
}

impl ProgressState {
    /// Fresh state for a session that just started.
    pub fn active() -> Self {
        Self {
            is_active: true,
            ..Self::default()
        }
    }
}
