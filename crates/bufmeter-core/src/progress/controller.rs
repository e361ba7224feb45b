//! Throttled progress evaluation and the emit/commit bookkeeping.

use crate::config::MeterConfig;
use crate::estimate::calculate_total_bytes;
use crate::media::usable_duration;
use crate::ranges::{self, MergedRangeSet, TimeRange};

use super::state::{Phase, ProgressState, ResourceProfile};

/// What a progress evaluation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStep {
    /// Session not active or already finalized.
    Inactive,
    /// Duration or total size not known yet.
    NotReady,
    /// No usable buffered ranges.
    NoRanges,
    /// Everything is buffered; the caller must take the full-coverage path.
    FullyCovered,
    /// Buffered end moved less than the throttle interval since the last evaluation.
    Throttled,
    /// Estimate updated to this absolute byte count (0 if nothing converted).
    Estimated(u64),
}

/// What a finalize step wants the caller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizePlan {
    /// Not ready, inactive, or finalized with nothing pending.
    Skip,
    /// Ready, but no new bytes since the last emission.
    NothingToSend,
    /// Emit this many delta bytes, then [`ProgressController::commit`] on success.
    Emit(u64),
}

/// Estimation state machine for one resource.
#[derive(Debug, Clone)]
pub struct ProgressController {
    profile: ResourceProfile,
    state: ProgressState,
    throttle_interval: f64,
    epsilon: f64,
}

impl ProgressController {
    /// New active session for `url`; the total size is filled in later.
    pub fn new(url: impl Into<String>, cfg: &MeterConfig) -> Self {
        Self {
            profile: ResourceProfile {
                url: url.into(),
                total_size_bytes: None,
            },
            state: ProgressState::active(),
            throttle_interval: cfg.progress_throttle_interval_secs,
            epsilon: cfg.range_merge_epsilon_secs,
        }
    }

    pub fn profile(&self) -> &ResourceProfile {
        &self.profile
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        if !self.state.is_active {
            Phase::Idle
        } else if self.state.is_finalized {
            Phase::Finalized
        } else {
            Phase::Tracking
        }
    }

    /// Records the resolved total size. A zero size stays "unknown".
    pub fn set_total_size(&mut self, bytes: u64) {
        self.profile.total_size_bytes = (bytes > 0).then_some(bytes);
    }

    /// Marks the session inactive; every later call is a no-op.
    pub fn deactivate(&mut self) {
        self.state = ProgressState::default();
    }

    fn merged(&self, raw: &[TimeRange]) -> MergedRangeSet {
        ranges::merge(&ranges::well_formed(raw.iter().copied()), self.epsilon)
    }

    /// Handles a progress signal: update the running estimate, or report that
    /// the resource is fully buffered. Never emits.
    pub fn evaluate_progress(&mut self, raw: &[TimeRange], duration: f64) -> ProgressStep {
        if !self.state.is_active || self.state.is_finalized {
            return ProgressStep::Inactive;
        }
        let (Some(total_size), Some(duration)) =
            (self.profile.total_size_bytes, usable_duration(duration))
        else {
            return ProgressStep::NotReady;
        };

        let merged = self.merged(raw);
        let Some(end) = merged.last_end() else {
            return ProgressStep::NoRanges;
        };
        if ranges::is_fully_covered(&merged, duration, self.epsilon) {
            return ProgressStep::FullyCovered;
        }

        let last = self.state.last_emitted_end_time;
        if last >= 0.0 && end - last < self.throttle_interval {
            return ProgressStep::Throttled;
        }

        self.state.last_emitted_end_time = end;
        let total = calculate_total_bytes(merged.iter(), duration, total_size);
        if total > 0 {
            self.state.estimated_bytes = total;
        }
        ProgressStep::Estimated(total)
    }

    /// Full-coverage shortcut: everything not yet reported is pending, and the
    /// session becomes finalized.
    pub fn plan_full_coverage(&mut self) -> FinalizePlan {
        if !self.state.is_active {
            return FinalizePlan::Skip;
        }
        if self.state.is_finalized {
            return self.pending_retry();
        }
        let Some(total_size) = self.profile.total_size_bytes else {
            return FinalizePlan::Skip;
        };
        let delta = total_size.saturating_sub(self.state.submitted_baseline_bytes);
        self.state.estimated_bytes = delta;
        self.state.is_finalized = true;
        Self::plan_for(delta)
    }

    /// Recomputes the delta over all buffered ranges for a finalize trigger.
    ///
    /// A finalized session only retries a delta whose delivery failed.
    pub fn plan_finalize(&mut self, raw: &[TimeRange], duration: f64) -> FinalizePlan {
        if !self.state.is_active {
            return FinalizePlan::Skip;
        }
        if self.state.is_finalized {
            return self.pending_retry();
        }
        let (Some(total_size), Some(duration)) =
            (self.profile.total_size_bytes, usable_duration(duration))
        else {
            return FinalizePlan::Skip;
        };

        let merged = self.merged(raw);
        let total = calculate_total_bytes(merged.iter(), duration, total_size);
        let delta = total.saturating_sub(self.state.submitted_baseline_bytes);
        self.state.estimated_bytes = delta;
        if total >= total_size {
            self.state.is_finalized = true;
        }
        Self::plan_for(delta)
    }

    fn pending_retry(&self) -> FinalizePlan {
        match self.state.estimated_bytes {
            0 => FinalizePlan::Skip,
            pending => FinalizePlan::Emit(pending),
        }
    }

    fn plan_for(delta: u64) -> FinalizePlan {
        if delta == 0 {
            FinalizePlan::NothingToSend
        } else {
            FinalizePlan::Emit(delta)
        }
    }

    /// Moves `delta` emitted bytes into the baseline and clears the estimate.
    pub fn commit(&mut self, delta: u64) {
        self.state.submitted_baseline_bytes =
            self.state.submitted_baseline_bytes.saturating_add(delta);
        self.state.estimated_bytes = 0;
        self.state.last_emitted_end_time = -1.0;
    }
}
