use crate::analysis::{Analyzer, ComparisonMetrics, PerformanceAnalyzer, SummaryStats, compare};
use crate::sampler::Sampler;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed analysis of a URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub url: String,
    pub stats: SummaryStats,
    pub completed_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn new(url: impl Into<String>, stats: SummaryStats) -> Self {
        Self {
            url: url.into(),
            stats,
            completed_at: Utc::now(),
        }
    }
}

/// Caller-owned collection of completed analyses, at most one per URL,
/// in the order they were added
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    records: Vec<AnalysisRecord>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[AnalysisRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.records.iter().any(|r| r.url == url)
    }

    pub fn add(&mut self, record: AnalysisRecord) -> Result<()> {
        if self.contains(&record.url) {
            return Err(Error::DuplicateUrl(record.url));
        }
        self.records.push(record);
        Ok(())
    }

    pub fn remove(&mut self, url: &str) -> Option<AnalysisRecord> {
        let index = self.records.iter().position(|r| r.url == url)?;
        Some(self.records.remove(index))
    }

    /// Sample and reduce `url`, then store the result.
    ///
    /// A URL already in the session is rejected before any request is made.
    pub async fn analyze(&mut self, url: &str, sampler: &Sampler) -> Result<&AnalysisRecord> {
        if self.contains(url) {
            return Err(Error::DuplicateUrl(url.to_string()));
        }

        let samples = sampler.sample_url(url, sampler.config().iterations).await?;
        let stats = PerformanceAnalyzer.analyze(&samples)?;

        tracing::info!(
            "Analysis of {} complete: avg={:.2}ms, p99={:.2}ms",
            url,
            stats.average,
            stats.p99
        );

        self.records.push(AnalysisRecord::new(url, stats));
        let index = self.records.len() - 1;
        Ok(&self.records[index])
    }

    /// Deltas between the first two records; later records are ignored
    pub fn comparison(&self) -> Option<ComparisonMetrics> {
        match self.records.as_slice() {
            [first, second, ..] => Some(compare(&first.stats, &second.stats)),
            _ => None,
        }
    }
}
