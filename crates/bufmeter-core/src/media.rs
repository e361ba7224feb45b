//! Player-side inputs: buffered ranges and the playback clock.

use std::sync::Mutex;

use crate::ranges::TimeRange;

/// Read-only view of a media element.
///
/// Implementations may return an error from `buffered_ranges`; the engine
/// treats that the same as "nothing buffered".
pub trait MediaSource: Send + Sync {
    /// Currently buffered ranges, in any order.
    fn buffered_ranges(&self) -> anyhow::Result<Vec<TimeRange>>;

    /// Current playback position in seconds.
    fn current_time(&self) -> f64;

    /// Total duration in seconds; NaN until metadata is known.
    fn duration(&self) -> f64;
}

/// Returns `duration` if it can be used for estimation.
pub(crate) fn usable_duration(duration: f64) -> Option<f64> {
    (duration.is_finite() && duration > 0.0).then_some(duration)
}

#[derive(Debug)]
struct ScriptedState {
    ranges: Vec<TimeRange>,
    current_time: f64,
    duration: f64,
    fail_reads: bool,
}

/// A media source whose state is set explicitly (trace replay, tests).
#[derive(Debug)]
pub struct ScriptedMedia {
    state: Mutex<ScriptedState>,
}

impl ScriptedMedia {
    /// Media with the given duration (use `f64::NAN` for "not loaded yet").
    pub fn new(duration: f64) -> Self {
        Self {
            state: Mutex::new(ScriptedState {
                ranges: Vec::new(),
                current_time: 0.0,
                duration,
                fail_reads: false,
            }),
        }
    }

    pub fn set_ranges(&self, ranges: Vec<TimeRange>) {
        self.state.lock().unwrap().ranges = ranges;
    }

    pub fn set_current_time(&self, t: f64) {
        self.state.lock().unwrap().current_time = t;
    }

    pub fn set_duration(&self, d: f64) {
        self.state.lock().unwrap().duration = d;
    }

    /// Makes `buffered_ranges` fail until cleared.
    pub fn set_fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }
}

impl MediaSource for ScriptedMedia {
    fn buffered_ranges(&self) -> anyhow::Result<Vec<TimeRange>> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            anyhow::bail!("buffered ranges unavailable");
        }
        Ok(state.ranges.clone())
    }

    fn current_time(&self) -> f64 {
        self.state.lock().unwrap().current_time
    }

    fn duration(&self) -> f64 {
        self.state.lock().unwrap().duration
    }
}
