//! In-process callback sink.

use async_trait::async_trait;

use crate::error::SinkError;
use crate::record::BufferData;

use super::EmissionSink;

/// Calls a user closure for every record.
pub struct CallbackSink<F> {
    callback: F,
}

impl<F> CallbackSink<F>
where
    F: Fn(&BufferData) -> anyhow::Result<()> + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

#[async_trait]
impl<F> EmissionSink for CallbackSink<F>
where
    F: Fn(&BufferData) -> anyhow::Result<()> + Send + Sync,
{
    fn name(&self) -> &str {
        "callback"
    }

    async fn emit(&self, data: &BufferData) -> Result<(), SinkError> {
        (self.callback)(data).map_err(SinkError::Callback)
    }
}
