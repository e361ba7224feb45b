//! HEAD / ranged-GET size probe with a per-URL cache.
//!
//! Uses the curl crate (libcurl). The blocking probe runs on
//! `spawn_blocking`; results are cached so repeated sessions for the same
//! URL cost no extra requests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::str;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::SizeError;

use super::parse::{parse_headers, SizeHeaders};
use super::SizeResolver;

/// Request style for one probe attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProbeKind {
    Head,
    /// `GET` with `Range: bytes=0-0`.
    FirstByte,
}

/// Performs one request and returns (status, parsed size headers).
///
/// The body is never downloaded: for GET the transfer is cut off at the first
/// body chunk, which libcurl reports as a write error.
fn probe_once(url: &str, kind: ProbeKind, timeout: Duration) -> Result<(u32, SizeHeaders), SizeError> {
    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    match kind {
        ProbeKind::Head => easy.nobody(true)?,
        ProbeKind::FirstByte => easy.range("0-0")?,
    }
    easy.follow_location(true)?;
    easy.connect_timeout(timeout.min(Duration::from_secs(15)))?;
    easy.timeout(timeout)?;

    let mut cut_off = false;
    let result = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.write_function(|_| {
            cut_off = true;
            Ok(0)
        })?;
        transfer.perform()
    };
    match result {
        Ok(()) => {}
        Err(e) if cut_off && e.is_write_error() => {}
        Err(e) => return Err(e.into()),
    }

    let code = easy.response_code()?;
    Ok((code, parse_headers(&headers)))
}

/// Blocking probe: HEAD first, then a one-byte ranged GET if HEAD gave no size.
pub fn probe_total_size(url: &str, timeout: Duration) -> Result<u64, SizeError> {
    let (code, head) = probe_once(url, ProbeKind::Head, timeout)?;
    if (200..300).contains(&code) {
        if let Some(size) = head.full_size() {
            return Ok(size);
        }
    }
    tracing::debug!(url, code, "HEAD gave no size, trying ranged GET");

    let (code, ranged) = probe_once(url, ProbeKind::FirstByte, timeout)?;
    let size = match code {
        206 => ranged.ranged_size(),
        200..=299 => ranged.full_size(),
        _ => {
            return Err(SizeError::Http {
                url: url.to_string(),
                status: code,
            })
        }
    };
    size.ok_or_else(|| SizeError::Unavailable {
        url: url.to_string(),
    })
}

/// Network size resolver with an in-memory cache keyed by URL.
#[derive(Debug)]
pub struct HeadProbeResolver {
    cache: Mutex<HashMap<String, u64>>,
    timeout: Duration,
}

impl Default for HeadProbeResolver {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl HeadProbeResolver {
    pub fn new(timeout: Duration) -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
            timeout,
        }
    }

    /// Cached size for `url`, if a previous probe succeeded.
    pub fn cached(&self, url: &str) -> Option<u64> {
        self.cache.lock().unwrap().get(url).copied()
    }
}

#[async_trait]
impl SizeResolver for HeadProbeResolver {
    async fn total_size(&self, url: &str) -> Result<u64, SizeError> {
        if let Some(size) = self.cached(url) {
            return Ok(size);
        }
        let owned = url.to_string();
        let timeout = self.timeout;
        let size = tokio::task::spawn_blocking(move || probe_total_size(&owned, timeout)).await??;
        self.cache.lock().unwrap().insert(url.to_string(), size);
        tracing::debug!(url, size, "resolved total size");
        Ok(size)
    }
}
