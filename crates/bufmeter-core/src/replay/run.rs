//! Drive a tracker through a trace.

use anyhow::Result;

use crate::config::MeterConfig;
use crate::media::ScriptedMedia;
use crate::progress::ProgressState;
use crate::record::BufferData;
use crate::sink::SinkSet;
use crate::size::{SizeResolver, StaticSizeResolver};
use crate::tracker::{BufferTracker, FinalizeOutcome, PageExit, Signal, SignalOutcome};

use super::{Trace, TraceEvent};

/// One replayed event and what the tracker did with it.
#[derive(Debug, Clone)]
pub struct ReplayStep {
    pub event: TraceEvent,
    pub outcome: SignalOutcome,
}

/// Everything a replay produced.
#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub steps: Vec<ReplayStep>,
    /// Counters after the last event.
    pub final_state: Option<ProgressState>,
}

impl ReplayReport {
    /// Records that every sink accepted, in order.
    pub fn delivered(&self) -> Vec<&BufferData> {
        self.steps
            .iter()
            .filter_map(|s| match &s.outcome {
                SignalOutcome::Finalize(FinalizeOutcome::Delivered(d)) => Some(d),
                _ => None,
            })
            .collect()
    }

    /// Sum of delivered bytes.
    pub fn total_delivered(&self) -> u64 {
        self.delivered().iter().map(|d| d.bytes).sum()
    }
}

/// Replays `trace` against a fresh tracker.
///
/// A `total_size` in the trace takes precedence over `resolver`.
pub async fn replay(
    trace: &Trace,
    config: MeterConfig,
    sinks: SinkSet,
    resolver: &dyn SizeResolver,
) -> Result<ReplayReport> {
    let media = ScriptedMedia::new(trace.duration.unwrap_or(f64::NAN));
    let tracker = BufferTracker::new(config, media, sinks)?;

    match trace.total_size {
        Some(size) => {
            let fixed = StaticSizeResolver::new().with(trace.url.trim(), size);
            tracker.start(&trace.url, &fixed).await?;
        }
        None => tracker.start(&trace.url, resolver).await?,
    }

    let mut steps = Vec::with_capacity(trace.events.len());
    for event in &trace.events {
        let signal = match event {
            TraceEvent::Progress { .. } => {
                tracker
                    .media()
                    .set_ranges(event.time_ranges().unwrap_or_default());
                Signal::Progress
            }
            TraceEvent::TimeUpdate { time } => {
                tracker.media().set_current_time(*time);
                Signal::TimeUpdate
            }
            TraceEvent::PageHide => Signal::PageExit(PageExit::PageHide),
            TraceEvent::Unload => Signal::PageExit(PageExit::Unload),
            TraceEvent::VisibilityHidden => Signal::PageExit(PageExit::VisibilityHidden),
        };
        let outcome = tracker.handle(signal).await;
        tracing::debug!(?event, ?outcome, "replayed");
        steps.push(ReplayStep {
            event: event.clone(),
            outcome,
        });
    }

    let final_state = tracker.state();
    tracker.destroy();
    Ok(ReplayReport { steps, final_state })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressStep;

    const TRACE: &str = r#"
        url = "https://cdn.example.com/a.mp4"
        duration = 100.0
        total_size = 1000000

        [[events]]
        kind = "progress"
        ranges = [[0.0, 10.0]]

        [[events]]
        kind = "progress"
        ranges = [[0.0, 10.1]]

        [[events]]
        kind = "progress"
        ranges = [[0.0, 50.0]]

        [[events]]
        kind = "visibility-hidden"

        [[events]]
        kind = "unload"

        [[events]]
        kind = "progress"
        ranges = [[0.0, 100.0]]
    "#;

    #[tokio::test]
    async fn replay_reports_each_byte_once() {
        let trace = Trace::from_toml_str(TRACE).unwrap();
        let report = replay(
            &trace,
            MeterConfig::default(),
            SinkSet::new(),
            &StaticSizeResolver::new(),
        )
        .await
        .unwrap();

        assert_eq!(report.steps.len(), 6);
        assert_eq!(
            report.steps[1].outcome,
            SignalOutcome::Progress(ProgressStep::Throttled)
        );
        assert_eq!(
            report.steps[4].outcome,
            SignalOutcome::Finalize(FinalizeOutcome::NothingToSend)
        );
        let bytes: Vec<u64> = report.delivered().iter().map(|d| d.bytes).collect();
        assert_eq!(bytes, vec![500_001, 1_000_000 - 500_001]);
        assert_eq!(report.total_delivered(), 1_000_000);
        let state = report.final_state.unwrap();
        assert!(state.is_finalized);
        assert_eq!(state.submitted_baseline_bytes, 1_000_000);
    }

    #[tokio::test]
    async fn replay_without_size_emits_nothing() {
        let mut trace = Trace::from_toml_str(TRACE).unwrap();
        trace.total_size = None;
        let report = replay(
            &trace,
            MeterConfig::default(),
            SinkSet::new(),
            &StaticSizeResolver::new(),
        )
        .await
        .unwrap();
        assert!(report.delivered().is_empty());
        assert_eq!(report.total_delivered(), 0);
    }

    #[tokio::test]
    async fn replay_uses_resolver_when_trace_has_no_size() {
        let mut trace = Trace::from_toml_str(TRACE).unwrap();
        trace.total_size = None;
        let resolver = StaticSizeResolver::new().with("https://cdn.example.com/a.mp4", 1000);
        let report = replay(&trace, MeterConfig::default(), SinkSet::new(), &resolver)
            .await
            .unwrap();
        assert_eq!(report.total_delivered(), 1000);
    }

    #[tokio::test]
    async fn replay_rejects_invalid_url() {
        let trace = Trace::from_toml_str(r#"url = "::bad::""#).unwrap();
        let result = replay(
            &trace,
            MeterConfig::default(),
            SinkSet::new(),
            &StaticSizeResolver::new(),
        )
        .await;
        assert!(result.is_err());
    }
}
