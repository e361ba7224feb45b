//! `bufmeter replay <trace>` – drive a tracker from a recorded trace.

use anyhow::Result;
use bufmeter_core::config::{DeliveryConfig, MeterConfig};
use bufmeter_core::replay::{self, Trace};
use bufmeter_core::sink::{CallbackSink, SinkSet};
use bufmeter_core::size::HeadProbeResolver;
use std::path::Path;

pub async fn run_replay(
    mut cfg: MeterConfig,
    path: &Path,
    size: Option<u64>,
    endpoint: Option<String>,
) -> Result<()> {
    let mut trace = Trace::load(path)?;
    if size.is_some() {
        trace.total_size = size;
    }
    if let Some(endpoint) = endpoint {
        let mut delivery = DeliveryConfig::new(endpoint);
        if let Some(existing) = &cfg.delivery {
            delivery.timeout_secs = existing.timeout_secs;
        }
        cfg.delivery = Some(delivery);
    }

    let sinks = SinkSet::from_config(&cfg).with(CallbackSink::new(|data| {
        println!("{}", serde_json::to_string(data)?);
        Ok(())
    }));

    let report = replay::replay(&trace, cfg, sinks, &HeadProbeResolver::default()).await?;
    tracing::info!(
        path = %path.display(),
        events = report.steps.len(),
        emissions = report.delivered().len(),
        "replay finished"
    );
    println!(
        "{} event(s), {} emission(s), {} byte(s) delivered",
        report.steps.len(),
        report.delivered().len(),
        report.total_delivered()
    );
    Ok(())
}
