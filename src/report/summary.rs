//! Aggregate counts for one pipeline run.
//!
//! Non-fatal data conditions (unparsable cells, incomplete rows, series with no
//! observations) never raise; they only show up here.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::Indicator;
use crate::panel::{ImputeStats, NormalizedSource};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceStats {
    pub indicator: Indicator,
    pub rows: usize,
    pub skipped_rows: usize,
    pub records: usize,
    pub null_values: usize,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
}

impl SourceStats {
    pub fn from_normalized(source: &NormalizedSource) -> Self {
        let range = source.year_range();
        Self {
            indicator: source.indicator,
            rows: source.rows,
            skipped_rows: source.skipped_rows,
            records: source.records.len(),
            null_values: source.null_values(),
            first_year: range.map(|(lo, _)| lo),
            last_year: range.map(|(_, hi)| hi),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub min_completeness: f64,
    pub sources: Vec<SourceStats>,
    pub merged_rows: usize,
    pub duplicate_keys: usize,
    pub retained_rows: usize,
    pub dropped_rows: usize,
    pub countries: usize,
    pub imputation: ImputeStats,
}
