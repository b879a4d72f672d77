use crate::status::{StatusCategory, lookup};
use serde::Serialize;
use std::collections::BTreeMap;

/// One row of the status breakdown for a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusBreakdown {
    pub status_code: u16,
    /// Reference name of the code, when it is a commonly seen one
    pub name: Option<&'static str>,
    pub category: StatusCategory,
    pub count: usize,
    /// Share of all samples, 0-100
    pub percent: f64,
}

/// Turns a reduced status histogram into display rows, ascending by code
pub struct StatusAnalyzer;

impl StatusAnalyzer {
    pub fn from_histogram(histogram: &BTreeMap<u16, usize>, total: usize) -> Vec<StatusBreakdown> {
        histogram
            .iter()
            .map(|(&status_code, &count)| StatusBreakdown {
                status_code,
                name: lookup(status_code).map(|info| info.name),
                category: StatusCategory::from_code(status_code),
                count,
                percent: if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64 * 100.0
                },
            })
            .collect()
    }
}
