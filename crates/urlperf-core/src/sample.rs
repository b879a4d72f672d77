use serde::{Deserialize, Serialize};

/// Status text recorded when a failed attempt carries no reason phrase
pub const FALLBACK_STATUS_TEXT: &str = "Error";

/// Outcome of one timed request attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleResult {
    pub duration_ms: f64,
    pub size_bytes: u64,
    pub status_code: u16,
    pub status_text: String,
}

impl SampleResult {
    pub fn new(duration_ms: f64, size_bytes: u64, status_code: u16, status_text: impl Into<String>) -> Self {
        Self {
            duration_ms,
            size_bytes,
            status_code,
            status_text: status_text.into(),
        }
    }

    /// A sample for an attempt that failed before its body was read.
    ///
    /// The size is always zero; an empty status text falls back to "Error".
    pub fn failed(duration_ms: f64, status_code: u16, status_text: &str) -> Self {
        let status_text = if status_text.is_empty() {
            FALLBACK_STATUS_TEXT
        } else {
            status_text
        };
        Self::new(duration_ms, 0, status_code, status_text)
    }
}

/// Ordered samples collected for a single URL.
///
/// A set only grows while the sampler owns it; callers get it back frozen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleSet {
    samples: Vec<SampleResult>,
}

impl SampleSet {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, sample: SampleResult) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SampleResult> {
        self.samples.iter()
    }

    pub fn as_slice(&self) -> &[SampleResult] {
        &self.samples
    }
}

impl From<Vec<SampleResult>> for SampleSet {
    fn from(samples: Vec<SampleResult>) -> Self {
        Self { samples }
    }
}

impl<'a> IntoIterator for &'a SampleSet {
    type Item = &'a SampleResult;
    type IntoIter = std::slice::Iter<'a, SampleResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
