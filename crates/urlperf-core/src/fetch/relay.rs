use super::{Transport, TransportError, TransportResponse};
use async_trait::async_trait;
use std::sync::Arc;
use url::Url;
use url::form_urlencoded::byte_serialize;

/// Public relay that returns the raw body of the URL passed in `url=`
pub const DEFAULT_RELAY_URL: &str = "https://api.allorigins.win/raw?url=";

/// Sends every request through a relay by appending the encoded target URL
/// to the relay base.
pub struct RelayTransport {
    inner: Arc<dyn Transport>,
    relay_base: String,
}

impl RelayTransport {
    pub fn new(inner: Arc<dyn Transport>, relay_base: impl Into<String>) -> Self {
        Self {
            inner,
            relay_base: relay_base.into(),
        }
    }

    pub fn relay_url(&self, target: &Url) -> Result<Url, TransportError> {
        let encoded: String = byte_serialize(target.as_str().as_bytes()).collect();
        let relayed = format!("{}{}", self.relay_base, encoded);
        Url::parse(&relayed)
            .map_err(|e| TransportError::Unreachable(format!("Invalid relay URL {}: {}", relayed, e)))
    }
}

#[async_trait]
impl Transport for RelayTransport {
    async fn perform(&self, url: &Url) -> Result<TransportResponse, TransportError> {
        let relayed = self.relay_url(url)?;
        tracing::debug!("Relaying {} via {}", url, relayed);
        self.inner.perform(&relayed).await
    }
}

/// Tries the primary transport and falls back to the secondary once when the
/// primary gets no response at all.
///
/// Failures that carry a status are returned as-is.
pub struct FallbackTransport {
    primary: Arc<dyn Transport>,
    fallback: Arc<dyn Transport>,
}

impl FallbackTransport {
    pub fn new(primary: Arc<dyn Transport>, fallback: Arc<dyn Transport>) -> Self {
        Self { primary, fallback }
    }

    /// Direct requests through `transport`, relayed through the same
    /// transport when the direct request fails
    pub fn with_relay(transport: Arc<dyn Transport>, relay_base: impl Into<String>) -> Self {
        let relay = RelayTransport::new(Arc::clone(&transport), relay_base);
        Self::new(transport, Arc::new(relay))
    }
}

#[async_trait]
impl Transport for FallbackTransport {
    async fn perform(&self, url: &Url) -> Result<TransportResponse, TransportError> {
        match self.primary.perform(url).await {
            Err(e) if e.status_code().is_none() => {
                tracing::warn!("Direct request to {} failed ({}), retrying via relay", url, e);
                self.fallback.perform(url).await
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::{ScriptedTransport, Step};

    fn target() -> Url {
        Url::parse("https://example.com/a b?x=1&y=2").unwrap()
    }

    #[test]
    fn test_relay_url_encodes_target() {
        let relay = RelayTransport::new(Arc::new(ScriptedTransport::always_ok()), DEFAULT_RELAY_URL);

        let url = relay.relay_url(&target()).unwrap();

        assert_eq!(url.host_str(), Some("api.allorigins.win"));
        let (_, value) = url.query_pairs().find(|(k, _)| k == "url").unwrap();
        assert_eq!(value, "https://example.com/a%20b?x=1&y=2");
    }

    #[tokio::test]
    async fn test_relay_sends_to_relay_host() {
        let inner = Arc::new(ScriptedTransport::always_ok());
        let relay = RelayTransport::new(inner.clone(), "http://relay.local/fetch?url=");

        relay.perform(&target()).await.unwrap();

        let seen = inner.seen();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].starts_with("http://relay.local/fetch?url=https%3A%2F%2Fexample.com"));
    }

    #[tokio::test]
    async fn test_fallback_used_when_unreachable() {
        let primary = Arc::new(ScriptedTransport::new(vec![Step::Unreachable]));
        let fallback = Arc::new(ScriptedTransport::always_ok());
        let transport = FallbackTransport::new(primary.clone(), fallback.clone());

        let response = transport.perform(&target()).await.unwrap();

        assert_eq!(response.status_code, 200);
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 1);
    }

    #[tokio::test]
    async fn test_fallback_skipped_for_status_failures() {
        let primary = Arc::new(ScriptedTransport::new(vec![Step::FailWithStatus(502)]));
        let fallback = Arc::new(ScriptedTransport::always_ok());
        let transport = FallbackTransport::new(primary, fallback.clone());

        let err = transport.perform(&target()).await.unwrap_err();

        assert_eq!(err.status_code(), Some(502));
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn test_fallback_skipped_on_success() {
        let primary = Arc::new(ScriptedTransport::always_ok());
        let fallback = Arc::new(ScriptedTransport::always_ok());
        let transport = FallbackTransport::new(primary, fallback.clone());

        transport.perform(&target()).await.unwrap();

        assert_eq!(fallback.calls(), 0);
    }
}
