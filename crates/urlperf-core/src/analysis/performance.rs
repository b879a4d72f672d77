use super::{Analyzer, SummaryStats};
use crate::sample::SampleSet;
use crate::{Error, Result};
use std::collections::BTreeMap;

/// Fraction used for the tail percentile
const P99: f64 = 0.99;

pub struct PerformanceAnalyzer;

impl Analyzer for PerformanceAnalyzer {
    type Output = SummaryStats;

    fn analyze(&self, samples: &SampleSet) -> Result<Self::Output> {
        reduce(samples)
    }
}

/// Reduce a sample set to summary statistics.
///
/// The 99th percentile is the element at `floor(n * 0.99)` of the ascending
/// durations, with no interpolation. For 20 samples that is index 19, the
/// maximum.
pub fn reduce(samples: &SampleSet) -> Result<SummaryStats> {
    tracing::debug!("Reducing {} samples", samples.len());

    if samples.is_empty() {
        return Err(Error::EmptySampleSet);
    }

    let count = samples.len();

    let mut durations: Vec<f64> = samples.iter().map(|s| s.duration_ms).collect();
    let average = durations.iter().sum::<f64>() / count as f64;
    durations.sort_by(f64::total_cmp);

    let min = durations[0];
    let max = durations[count - 1];
    let p99_index = ((count as f64 * P99).floor() as usize).min(count - 1);
    let p99 = durations[p99_index];

    let total_size_bytes: u64 = samples.iter().map(|s| s.size_bytes).sum();
    let average_size_bytes = total_size_bytes as f64 / count as f64;

    let mut status_histogram = BTreeMap::new();
    for sample in samples {
        *status_histogram.entry(sample.status_code).or_insert(0) += 1;
    }

    tracing::info!(
        "Reduced {} samples: avg={:.2}ms, min={:.2}ms, max={:.2}ms, p99={:.2}ms",
        count,
        average,
        min,
        max,
        p99
    );

    Ok(SummaryStats {
        average,
        min,
        max,
        p99,
        total_size_bytes,
        average_size_bytes,
        status_histogram,
        sample_count: count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::SampleResult;

    fn samples_from(durations: &[f64]) -> SampleSet {
        durations
            .iter()
            .map(|&d| SampleResult::new(d, 1000, 200, "OK"))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_empty_set_is_rejected() {
        let result = reduce(&SampleSet::default());
        assert!(matches!(result, Err(Error::EmptySampleSet)));
    }

    #[test]
    fn test_uniform_run() {
        let samples = samples_from(&[100.0; 20]);

        let stats = reduce(&samples).unwrap();

        assert_eq!(stats.average, 100.0);
        assert_eq!(stats.min, 100.0);
        assert_eq!(stats.max, 100.0);
        assert_eq!(stats.p99, 100.0);
        assert_eq!(stats.total_size_bytes, 20_000);
        assert_eq!(stats.average_size_bytes, 1000.0);
        assert_eq!(stats.status_histogram.len(), 1);
        assert_eq!(stats.status_histogram[&200], 20);
        assert_eq!(stats.sample_count, 20);
    }

    #[test]
    fn test_p99_of_twenty_is_the_maximum() {
        // Reversed so the reducer has to sort
        let durations: Vec<f64> = (1..=20).rev().map(|i| i as f64 * 10.0).collect();
        let samples = samples_from(&durations);

        let stats = reduce(&samples).unwrap();

        assert_eq!(stats.p99, 200.0);
        assert_eq!(stats.max, 200.0);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.average, 105.0);
    }

    #[test]
    fn test_p99_uses_truncating_index() {
        // floor(150 * 0.99) = 148, so p99 is the second largest value
        let durations: Vec<f64> = (0..150).map(|i| i as f64).collect();
        let stats = reduce(&samples_from(&durations)).unwrap();
        assert_eq!(stats.p99, 148.0);

        // floor(1 * 0.99) = 0
        let stats = reduce(&samples_from(&[42.0])).unwrap();
        assert_eq!(stats.p99, 42.0);
    }

    #[test]
    fn test_order_invariants_hold() {
        let samples = samples_from(&[250.3, 12.1, 97.0, 97.0, 3.2, 1500.9, 48.0]);

        let stats = reduce(&samples).unwrap();

        assert!(stats.min <= stats.average && stats.average <= stats.max);
        assert!(stats.min <= stats.p99 && stats.p99 <= stats.max);
        assert_eq!(stats.min, 3.2);
        assert_eq!(stats.max, 1500.9);
    }

    #[test]
    fn test_histogram_and_sizes() {
        let samples = SampleSet::from(vec![
            SampleResult::new(10.0, 500, 200, "OK"),
            SampleResult::failed(20.0, 503, "Service Unavailable"),
            SampleResult::new(30.0, 700, 200, "OK"),
            SampleResult::new(40.0, 0, 404, "Not Found"),
        ]);

        let stats = reduce(&samples).unwrap();

        assert_eq!(stats.status_histogram[&200], 2);
        assert_eq!(stats.status_histogram[&503], 1);
        assert_eq!(stats.status_histogram[&404], 1);
        assert_eq!(stats.status_histogram.values().sum::<usize>(), samples.len());
        assert_eq!(stats.total_size_bytes, 1200);
        assert_eq!(stats.average_size_bytes, 300.0);
    }

    #[test]
    fn test_analyzer_delegates_to_reduce() {
        let samples = samples_from(&[5.0, 15.0]);
        let stats = PerformanceAnalyzer.analyze(&samples).unwrap();
        assert_eq!(stats.average, 10.0);
    }
}
