//! Per-resource tracking session: signal handling and emit-and-reset.
//!
//! A [`BufferTracker`] reads the media element on every signal, feeds the
//! [`ProgressController`], and on finalize triggers (near end of playback,
//! full coverage, page exit) hands a [`BufferData`] record to its sinks.
//!
//! Handlers take `&self`. Session state sits behind a mutex that is never held
//! across an await; one in-flight flag admits a single finalize at a time, and
//! a generation counter keeps a delivery that outlives `destroy()` (or a
//! restart) from touching the new session.

mod guard;
mod signal;

use std::sync::atomic::AtomicBool;
use std::sync::Mutex;

use crate::config::{MeterConfig, ResetPolicy};
use crate::error::SetupError;
use crate::media::{usable_duration, MediaSource};
use crate::progress::{FinalizePlan, Phase, ProgressController, ProgressState, ProgressStep, ResourceProfile};
use crate::ranges::TimeRange;
use crate::record::BufferData;
use crate::sink::SinkSet;
use crate::size::SizeResolver;

use guard::InFlightGuard;

pub use signal::{FinalizeOutcome, PageExit, Signal, SignalOutcome};

#[derive(Debug, Default)]
struct Session {
    generation: u64,
    controller: Option<ProgressController>,
}

/// Tracks downloaded bytes of one media resource at a time.
pub struct BufferTracker<M> {
    config: MeterConfig,
    media: M,
    sinks: SinkSet,
    session: Mutex<Session>,
    finalizing: AtomicBool,
}

impl<M: MediaSource> BufferTracker<M> {
    /// Validates `config` and builds an idle tracker.
    pub fn new(config: MeterConfig, media: M, sinks: SinkSet) -> Result<Self, SetupError> {
        config.validate()?;
        Ok(Self {
            config,
            media,
            sinks,
            session: Mutex::new(Session::default()),
            finalizing: AtomicBool::new(false),
        })
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    /// Starts (or restarts) tracking `url`, discarding any previous session.
    ///
    /// URL problems fail immediately. A failed size lookup does not: the
    /// session stays up but every byte computation is skipped.
    pub async fn start(&self, url: &str, resolver: &dyn SizeResolver) -> Result<(), SetupError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(SetupError::EmptyUrl);
        }
        url::Url::parse(url).map_err(|source| SetupError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let generation = {
            let mut session = self.session.lock().unwrap();
            session.generation += 1;
            session.controller = Some(ProgressController::new(url, &self.config));
            session.generation
        };
        tracing::info!(url, "tracking started");

        match resolver.total_size(url).await {
            Ok(size) => {
                let mut session = self.session.lock().unwrap();
                if session.generation != generation {
                    tracing::debug!(url, "session replaced before size resolved");
                    return Ok(());
                }
                if let Some(controller) = session.controller.as_mut() {
                    controller.set_total_size(size);
                }
            }
            Err(e) => {
                tracing::warn!(url, "total size unavailable, estimation disabled: {}", e);
            }
        }
        Ok(())
    }

    /// Stops tracking. Safe while a finalize is in flight: its result is dropped.
    pub fn destroy(&self) {
        let mut session = self.session.lock().unwrap();
        session.generation += 1;
        if let Some(mut controller) = session.controller.take() {
            controller.deactivate();
            tracing::debug!(url = %controller.profile().url, "tracking stopped");
        }
    }

    pub fn phase(&self) -> Phase {
        self.session
            .lock()
            .unwrap()
            .controller
            .as_ref()
            .map(ProgressController::phase)
            .unwrap_or(Phase::Idle)
    }

    /// Copy of the current counters, `None` when idle.
    pub fn state(&self) -> Option<ProgressState> {
        let session = self.session.lock().unwrap();
        session.controller.as_ref().map(|c| c.state().clone())
    }

    pub fn profile(&self) -> Option<ResourceProfile> {
        let session = self.session.lock().unwrap();
        session.controller.as_ref().map(|c| c.profile().clone())
    }

    /// Dispatches one host signal to its handler.
    pub async fn handle(&self, signal: Signal) -> SignalOutcome {
        match signal {
            Signal::Progress => self.on_progress().await,
            Signal::TimeUpdate => self.on_time_update().await,
            Signal::PageExit(kind) => self.on_page_exit(kind).await,
        }
    }

    fn read_ranges(&self) -> Vec<TimeRange> {
        self.media.buffered_ranges().unwrap_or_else(|e| {
            tracing::debug!("buffered ranges unreadable, treating as empty: {:#}", e);
            Vec::new()
        })
    }

    /// Progress signal: refresh the running estimate, or finalize on full coverage.
    pub async fn on_progress(&self) -> SignalOutcome {
        let ranges = self.read_ranges();
        let duration = self.media.duration();
        let step = {
            let mut session = self.session.lock().unwrap();
            match session.controller.as_mut() {
                Some(controller) => controller.evaluate_progress(&ranges, duration),
                None => return SignalOutcome::Ignored,
            }
        };

        match step {
            ProgressStep::FullyCovered => {
                tracing::debug!("resource fully buffered");
                SignalOutcome::Finalize(self.emit_with(ProgressController::plan_full_coverage).await)
            }
            ProgressStep::Estimated(bytes) => {
                tracing::trace!(bytes, "estimate updated");
                SignalOutcome::Progress(step)
            }
            other => SignalOutcome::Progress(other),
        }
    }

    /// Time update: finalize once playback is within the final probe threshold.
    pub async fn on_time_update(&self) -> SignalOutcome {
        if self.phase() == Phase::Idle {
            return SignalOutcome::Ignored;
        }
        let Some(duration) = usable_duration(self.media.duration()) else {
            return SignalOutcome::Ignored;
        };
        let remaining = duration - self.media.current_time();
        if remaining <= self.config.final_probe_threshold_secs {
            SignalOutcome::Finalize(self.finalize().await)
        } else {
            SignalOutcome::Ignored
        }
    }

    /// Page hide, unload or visibility change to hidden.
    pub async fn on_page_exit(&self, kind: PageExit) -> SignalOutcome {
        if self.phase() == Phase::Idle {
            return SignalOutcome::Ignored;
        }
        tracing::debug!(?kind, "page exit");
        SignalOutcome::Finalize(self.finalize().await)
    }

    /// Computes the unsent delta over all buffered ranges and emits it.
    pub async fn finalize(&self) -> FinalizeOutcome {
        let ranges = self.read_ranges();
        let duration = self.media.duration();
        self.emit_with(|c| c.plan_finalize(&ranges, duration)).await
    }

    /// Plans under the lock, delivers without it, then commits if the session
    /// is still the one that planned.
    async fn emit_with<F>(&self, plan: F) -> FinalizeOutcome
    where
        F: FnOnce(&mut ProgressController) -> FinalizePlan,
    {
        let Some(_in_flight) = InFlightGuard::acquire(&self.finalizing) else {
            tracing::debug!("finalize already in flight");
            return FinalizeOutcome::InFlight;
        };

        let (generation, delta, url) = {
            let mut session = self.session.lock().unwrap();
            let generation = session.generation;
            let Some(controller) = session.controller.as_mut() else {
                return FinalizeOutcome::Skipped;
            };
            match plan(controller) {
                FinalizePlan::Skip => return FinalizeOutcome::Skipped,
                FinalizePlan::NothingToSend => return FinalizeOutcome::NothingToSend,
                FinalizePlan::Emit(delta) => (generation, delta, controller.profile().url.clone()),
            }
        };

        let data = BufferData::new(delta, url);
        let delivery = self.sinks.dispatch(&data).await;

        let mut session = self.session.lock().unwrap();
        let current = if session.generation == generation {
            session.controller.as_mut()
        } else {
            None
        };
        let Some(controller) = current else {
            tracing::debug!(url = %data.resource_url, "session ended during delivery, not committing");
            return match delivery {
                Ok(()) => FinalizeOutcome::Delivered(data),
                Err(_) => FinalizeOutcome::DeliveryFailed(data),
            };
        };

        match delivery {
            Ok(()) => {
                controller.commit(delta);
                tracing::info!(url = %data.resource_url, bytes = data.bytes, "buffered bytes emitted");
                FinalizeOutcome::Delivered(data)
            }
            Err(e) => {
                if self.config.reset_policy == ResetPolicy::Always {
                    controller.commit(delta);
                    tracing::warn!(url = %data.resource_url, bytes = data.bytes, "delivery failed, delta dropped: {}", e);
                } else {
                    tracing::warn!(url = %data.resource_url, bytes = data.bytes, "delivery failed, delta kept for retry: {}", e);
                }
                FinalizeOutcome::DeliveryFailed(data)
            }
        }
    }
}
