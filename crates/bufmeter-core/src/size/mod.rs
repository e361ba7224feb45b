//! Total resource size resolution.
//!
//! The engine needs the byte size of the tracked resource once per session.
//! [`HeadProbeResolver`] asks the origin (HEAD, then a one-byte ranged GET)
//! and caches answers per URL; [`StaticSizeResolver`] serves known sizes.

mod parse;
mod probe;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::SizeError;

pub use parse::SizeHeaders;
pub use probe::HeadProbeResolver;

/// Resolves the total size in bytes of a resource.
#[async_trait]
pub trait SizeResolver: Send + Sync {
    async fn total_size(&self, url: &str) -> Result<u64, SizeError>;
}

/// Fixed url -> size table.
#[derive(Debug, Clone, Default)]
pub struct StaticSizeResolver {
    sizes: HashMap<String, u64>,
}

impl StaticSizeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, bytes: u64) -> Self {
        self.sizes.insert(url.into(), bytes);
        self
    }
}

#[async_trait]
impl SizeResolver for StaticSizeResolver {
    async fn total_size(&self, url: &str) -> Result<u64, SizeError> {
        match self.sizes.get(url) {
            Some(&bytes) if bytes > 0 => Ok(bytes),
            _ => Err(SizeError::Unavailable {
                url: url.to_string(),
            }),
        }
    }
}
