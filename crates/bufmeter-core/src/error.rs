//! Error types for setup validation and collaborator failures.
//!
//! Missing inputs (no duration yet, no ranges, unknown size) are not errors:
//! the engine skips the evaluation cycle instead.

use thiserror::Error;

/// Invalid configuration, reported once at setup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a finite, non-negative number of seconds (got {value})")]
    InvalidSeconds { name: &'static str, value: f64 },
    #[error("invalid delivery endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
    #[error("delivery timeout must be greater than zero")]
    ZeroTimeout,
}

/// Tracking could not be set up. Returned synchronously to the caller.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("resource URL is empty")]
    EmptyUrl,
    #[error("invalid resource URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// The total size of a resource could not be determined.
#[derive(Debug, Error)]
pub enum SizeError {
    #[error("no size available for {url}")]
    Unavailable { url: String },
    #[error("size probe for {url} returned HTTP {status}")]
    Http { url: String, status: u32 },
    #[error("size probe transport error: {0}")]
    Transport(#[from] curl::Error),
    #[error("size probe task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A sink failed to accept an emitted record.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("callback failed: {0:#}")]
    Callback(anyhow::Error),
    #[error("delivery endpoint returned HTTP {0}")]
    Http(u32),
    #[error("delivery transport error: {0}")]
    Transport(#[from] curl::Error),
    #[error("encode record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("delivery task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("{failed} of {total} sinks failed")]
    Partial { failed: usize, total: usize },
}
