//! Network delivery: POST each record as JSON.
//!
//! Uses the curl crate (libcurl) on a blocking thread, like the size probe.

use async_trait::async_trait;
use std::time::Duration;

use crate::config::DeliveryConfig;
use crate::error::SinkError;
use crate::record::BufferData;

use super::EmissionSink;

/// Posts records to a fixed analytics endpoint.
#[derive(Debug, Clone)]
pub struct HttpSink {
    endpoint: String,
    timeout: Duration,
}

impl HttpSink {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
        }
    }

    pub fn from_config(cfg: &DeliveryConfig) -> Self {
        Self::new(cfg.endpoint.clone(), Duration::from_secs(cfg.timeout_secs))
    }
}

/// Blocking POST of `body`; returns the HTTP status.
fn post_json(endpoint: &str, body: &[u8], timeout: Duration) -> Result<u32, curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(endpoint)?;
    easy.post(true)?;
    easy.post_fields_copy(body)?;
    easy.connect_timeout(timeout.min(Duration::from_secs(15)))?;
    easy.timeout(timeout)?;

    let mut list = curl::easy::List::new();
    list.append("Content-Type: application/json")?;
    // Small bodies; skip the 100-continue round trip.
    list.append("Expect:")?;
    easy.http_headers(list)?;

    {
        let mut transfer = easy.transfer();
        // Response body is not used.
        transfer.write_function(|data| Ok(data.len()))?;
        transfer.perform()?;
    }
    easy.response_code()
}

#[async_trait]
impl EmissionSink for HttpSink {
    fn name(&self) -> &str {
        "http"
    }

    async fn emit(&self, data: &BufferData) -> Result<(), SinkError> {
        let body = serde_json::to_vec(data)?;
        let endpoint = self.endpoint.clone();
        let timeout = self.timeout;
        let code =
            tokio::task::spawn_blocking(move || post_json(&endpoint, &body, timeout)).await??;
        if !(200..300).contains(&code) {
            return Err(SinkError::Http(code));
        }
        tracing::debug!(endpoint = %self.endpoint, bytes = data.bytes, "record delivered");
        Ok(())
    }
}
