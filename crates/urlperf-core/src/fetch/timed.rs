use super::{Transport, TransportError};
use crate::sample::SampleResult;
use crate::{Error, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs single requests through a transport under a deadline
#[derive(Clone)]
pub struct TimedFetcher {
    transport: Arc<dyn Transport>,
}

impl TimedFetcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Perform one timed request.
    ///
    /// The clock covers the whole exchange including the body. A failure
    /// that still carries a status becomes a zero-size sample; a failure
    /// without one, or a missed deadline, is returned as an error.
    pub async fn fetch_timed(&self, url: &Url, timeout: Duration) -> Result<SampleResult> {
        let start = Instant::now();
        let outcome = tokio::time::timeout(timeout, self.transport.perform(url)).await;
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        match outcome {
            Ok(Ok(response)) => Ok(SampleResult::new(
                duration_ms,
                response.body_size_bytes,
                response.status_code,
                response.status_text,
            )),
            Ok(Err(TransportError::Status {
                status_code,
                status_text,
                reason,
            })) => {
                tracing::debug!("{} failed with status {}: {}", url, status_code, reason);
                Ok(SampleResult::failed(duration_ms, status_code, &status_text))
            }
            Ok(Err(TransportError::Unreachable(reason))) => Err(Error::Transport(reason)),
            Err(_) => {
                tracing::debug!("{} timed out after {:.2}ms", url, duration_ms);
                Err(Error::Timeout {
                    elapsed_ms: duration_ms,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::{ScriptedTransport, Step};

    fn url() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    #[tokio::test]
    async fn test_success_becomes_sample() {
        let fetcher = TimedFetcher::new(Arc::new(ScriptedTransport::new(vec![Step::Respond {
            status_code: 201,
            size: 42,
        }])));

        let sample = fetcher.fetch_timed(&url(), DEFAULT_TIMEOUT).await.unwrap();

        assert_eq!(sample.status_code, 201);
        assert_eq!(sample.size_bytes, 42);
        assert!(sample.duration_ms >= 0.0);
    }

    #[tokio::test]
    async fn test_status_failure_becomes_empty_sample() {
        let fetcher = TimedFetcher::new(Arc::new(ScriptedTransport::new(vec![Step::FailWithStatus(
            503,
        )])));

        let sample = fetcher.fetch_timed(&url(), DEFAULT_TIMEOUT).await.unwrap();

        assert_eq!(sample.status_code, 503);
        assert_eq!(sample.size_bytes, 0);
        assert_eq!(sample.status_text, "Error");
    }

    #[tokio::test]
    async fn test_unreachable_is_an_error() {
        let fetcher = TimedFetcher::new(Arc::new(ScriptedTransport::new(vec![Step::Unreachable])));

        let err = fetcher.fetch_timed(&url(), DEFAULT_TIMEOUT).await.unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test]
    async fn test_hanging_request_times_out() {
        let fetcher = TimedFetcher::new(Arc::new(ScriptedTransport::new(vec![Step::Hang])));

        let err = fetcher
            .fetch_timed(&url(), Duration::from_millis(20))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Request timed out");
        match err {
            Error::Timeout { elapsed_ms } => assert!(elapsed_ms >= 20.0),
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
