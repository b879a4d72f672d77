//! Request transports and the per-attempt timed fetcher.
//!
//! A [`Transport`] performs one GET and reads the body to completion. How the
//! request reaches the target (directly, or through a relay) is decided by
//! the transport; the [`TimedFetcher`] only adds the clock and the timeout.

mod client;
mod relay;
mod timed;

#[cfg(test)]
pub(crate) mod testing;

pub use client::HttpTransport;
pub use relay::{DEFAULT_RELAY_URL, FallbackTransport, RelayTransport};
pub use timed::{DEFAULT_TIMEOUT, TimedFetcher};

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// A fully received response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status_code: u16,
    pub status_text: String,
    pub body_size_bytes: u64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request failed after a status line was received
    #[error("HTTP {status_code} {status_text}: {reason}")]
    Status {
        status_code: u16,
        status_text: String,
        reason: String,
    },

    /// No response was received at all
    #[error("{0}")]
    Unreachable(String),
}

impl TransportError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TransportError::Status { status_code, .. } => Some(*status_code),
            TransportError::Unreachable(_) => None,
        }
    }
}

/// Performs one request against a URL.
///
/// Dropping the returned future cancels the request.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn perform(&self, url: &Url) -> Result<TransportResponse, TransportError>;
}
