//! Emission sinks: where finalized [`BufferData`] records go.
//!
//! A tracker owns one [`SinkSet`] holding zero or more sinks. Each sink is
//! invoked independently, so a failing network delivery never prevents the
//! user callback from running (and vice versa).

mod callback;
mod http;
mod set;

use async_trait::async_trait;

use crate::error::SinkError;
use crate::record::BufferData;

pub use callback::CallbackSink;
pub use http::HttpSink;
pub use set::SinkSet;

/// Receives emitted records.
#[async_trait]
pub trait EmissionSink: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Deliver one record. Implementations must not panic on failure.
    async fn emit(&self, data: &BufferData) -> Result<(), SinkError>;
}
