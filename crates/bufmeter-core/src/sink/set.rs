//! Fan-out over zero or more sinks.

use crate::config::MeterConfig;
use crate::error::SinkError;
use crate::record::BufferData;

use super::{EmissionSink, HttpSink};

/// Ordered collection of sinks, invoked independently.
#[derive(Default)]
pub struct SinkSet {
    sinks: Vec<Box<dyn EmissionSink>>,
}

impl SinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sinks implied by configuration (currently only `[delivery]`).
    pub fn from_config(cfg: &MeterConfig) -> Self {
        let mut set = Self::new();
        if let Some(delivery) = &cfg.delivery {
            set.push(HttpSink::from_config(delivery));
        }
        set
    }

    pub fn push(&mut self, sink: impl EmissionSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn with(mut self, sink: impl EmissionSink + 'static) -> Self {
        self.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Hands `data` to every sink. Succeeds only if all of them accepted it.
    ///
    /// A failing sink is logged and does not stop the remaining ones. An empty
    /// set has nobody to fail and always succeeds.
    pub async fn dispatch(&self, data: &BufferData) -> Result<(), SinkError> {
        let mut failed = 0usize;
        for sink in &self.sinks {
            if let Err(e) = sink.emit(data).await {
                failed += 1;
                tracing::warn!(sink = sink.name(), url = %data.resource_url, "emit failed: {}", e);
            }
        }
        if failed > 0 {
            return Err(SinkError::Partial {
                failed,
                total: self.sinks.len(),
            });
        }
        Ok(())
    }
}
