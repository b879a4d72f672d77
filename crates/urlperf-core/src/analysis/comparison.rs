use super::SummaryStats;
use serde::{Deserialize, Serialize};

/// Signed differences `second - first` between two analyses.
///
/// Positive timing deltas mean the second URL was slower.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMetrics {
    pub average_diff: f64,
    pub min_diff: f64,
    pub max_diff: f64,
    pub p99_diff: f64,
    pub size_diff: f64,
}

pub fn compare(first: &SummaryStats, second: &SummaryStats) -> ComparisonMetrics {
    ComparisonMetrics {
        average_diff: second.average - first.average,
        min_diff: second.min - first.min,
        max_diff: second.max - first.max,
        p99_diff: second.p99 - first.p99,
        size_diff: second.average_size_bytes - first.average_size_bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn stats(average: f64, min: f64, max: f64, p99: f64, average_size_bytes: f64) -> SummaryStats {
        SummaryStats {
            average,
            min,
            max,
            p99,
            total_size_bytes: (average_size_bytes * 20.0) as u64,
            average_size_bytes,
            status_histogram: BTreeMap::from([(200, 20)]),
            sample_count: 20,
        }
    }

    #[test]
    fn test_average_delta_is_second_minus_first() {
        let a = stats(100.0, 90.0, 110.0, 110.0, 1000.0);
        let b = stats(150.0, 90.0, 110.0, 110.0, 1000.0);

        let metrics = compare(&a, &b);

        assert_eq!(metrics.average_diff, 50.0);
        assert_eq!(metrics.min_diff, 0.0);
    }

    #[test]
    fn test_negative_deltas_when_second_is_faster() {
        let a = stats(200.0, 150.0, 400.0, 390.0, 2048.0);
        let b = stats(120.0, 100.0, 300.0, 280.0, 1024.0);

        let metrics = compare(&a, &b);

        assert_eq!(metrics.average_diff, -80.0);
        assert_eq!(metrics.min_diff, -50.0);
        assert_eq!(metrics.max_diff, -100.0);
        assert_eq!(metrics.p99_diff, -110.0);
        assert_eq!(metrics.size_diff, -1024.0);
    }
}
