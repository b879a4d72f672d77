mod comparison;
mod performance;
mod status;

pub use comparison::{ComparisonMetrics, compare};
pub use performance::{PerformanceAnalyzer, reduce};
pub use status::{StatusAnalyzer, StatusBreakdown};

use crate::sample::SampleSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Order statistics and size totals for one sample set.
///
/// Durations are in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub p99: f64,
    pub total_size_bytes: u64,
    pub average_size_bytes: f64,
    pub status_histogram: BTreeMap<u16, usize>,
    pub sample_count: usize,
}

pub trait Analyzer {
    type Output;

    fn analyze(&self, samples: &SampleSet) -> crate::Result<Self::Output>;
}
