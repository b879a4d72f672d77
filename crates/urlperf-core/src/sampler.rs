use crate::fetch::{DEFAULT_TIMEOUT, TimedFetcher, Transport};
use crate::sample::{SampleResult, SampleSet};
use crate::{Error, Result, target};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_ITERATIONS: usize = 20;

/// Status code recorded for an attempt that hit its deadline
pub const TIMEOUT_STATUS_CODE: u16 = 0;

/// What a missed deadline does to the rest of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeoutPolicy {
    /// Fail the whole run, like any failure without a status
    #[default]
    AbortRun,
    /// Record the attempt with status 0 and keep going
    RecordAttempt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerConfig {
    pub iterations: usize,
    pub timeout: Duration,
    pub timeout_policy: TimeoutPolicy,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            timeout: DEFAULT_TIMEOUT,
            timeout_policy: TimeoutPolicy::default(),
        }
    }
}

/// Drives a fixed number of sequential timed requests against one URL
pub struct Sampler {
    fetcher: TimedFetcher,
    config: SamplerConfig,
}

impl Sampler {
    pub fn new(transport: Arc<dyn Transport>, config: SamplerConfig) -> Self {
        Self {
            fetcher: TimedFetcher::new(transport),
            config,
        }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Sample `url` exactly `iterations` times.
    ///
    /// Attempts never overlap, so each duration covers a single round trip.
    /// The URL is validated before the first attempt. Any attempt failing
    /// without a status (and, under [`TimeoutPolicy::AbortRun`], any timeout)
    /// fails the whole call and the samples gathered so far are dropped.
    pub async fn sample_url(&self, url: &str, iterations: usize) -> Result<SampleSet> {
        let target = target::parse_http_url(url)?;

        tracing::info!("Sampling {} ({} iterations)", target, iterations);

        let mut samples = SampleSet::with_capacity(iterations);
        for attempt in 1..=iterations {
            let sample = match self.fetcher.fetch_timed(&target, self.config.timeout).await {
                Ok(sample) => sample,
                Err(Error::Timeout { elapsed_ms })
                    if self.config.timeout_policy == TimeoutPolicy::RecordAttempt =>
                {
                    tracing::warn!("Attempt {}/{} timed out, recording it", attempt, iterations);
                    SampleResult::new(elapsed_ms, 0, TIMEOUT_STATUS_CODE, "Request timed out")
                }
                Err(e) => {
                    tracing::warn!("Attempt {}/{} against {} failed: {}", attempt, iterations, target, e);
                    return Err(e);
                }
            };

            tracing::debug!(
                "Attempt {}/{}: {} in {:.2}ms, {} bytes",
                attempt,
                iterations,
                sample.status_code,
                sample.duration_ms,
                sample.size_bytes
            );
            samples.push(sample);
        }

        Ok(samples)
    }
}
