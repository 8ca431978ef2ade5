//! Full outer join of normalized sources on `(country_code, year)`.

use std::collections::{BTreeMap, HashSet};

use tracing::{info, warn};

use crate::domain::{CountryYearKey, MergedRecord};
use crate::error::AppError;
use crate::panel::normalize::NormalizedSource;

type Joined = BTreeMap<CountryYearKey, MergedRecord>;

/// Merged rows sorted by `(country_code, year)`.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTable {
    pub rows: Vec<MergedRecord>,
    /// Repeated keys inside a single source (first non-null value kept).
    pub duplicate_keys: usize,
}

/// Outer-join every source into one row per country-year.
///
/// Sources are folded left to right. The resulting content does not depend on
/// source order, and rows come out key-sorted, so the row order does not either.
pub fn merge_sources(sources: &[NormalizedSource]) -> Result<MergedTable, AppError> {
    if sources.is_empty() {
        return Err(AppError::input("No sources to merge."));
    }

    let mut declared = HashSet::new();
    for source in sources {
        if !declared.insert(source.indicator) {
            return Err(AppError::input(format!(
                "Indicator '{}' is supplied by more than one source.",
                source.indicator
            )));
        }
    }

    let (joined, duplicate_keys) = sources
        .iter()
        .fold((Joined::new(), 0usize), |(left, dups), right| {
            let (joined, more) = outer_join(left, right);
            (joined, dups + more)
        });

    if duplicate_keys > 0 {
        warn!(duplicate_keys, "sources repeat country-year keys; first non-null value kept");
    }

    let rows: Vec<MergedRecord> = joined.into_values().collect();
    info!(sources = sources.len(), rows = rows.len(), "merged sources");

    Ok(MergedTable { rows, duplicate_keys })
}

fn outer_join(mut left: Joined, right: &NormalizedSource) -> (Joined, usize) {
    let mut seen = HashSet::with_capacity(right.records.len());
    let mut duplicates = 0usize;

    for record in &right.records {
        let key = record.key();
        if !seen.insert(key.clone()) {
            duplicates += 1;
        }

        let row = left
            .entry(key)
            .or_insert_with(|| MergedRecord::new(&record.country_name, &record.country_code, record.year));

        if row.country_name.is_empty() && !record.country_name.is_empty() {
            row.country_name = record.country_name.clone();
        }
        if row.values.get(record.indicator).is_none() {
            row.values.set(record.indicator, record.value);
        }
    }

    (left, duplicates)
}
