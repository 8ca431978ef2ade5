//! Per-country temporal gap filling.
//!
//! Rows are first partitioned into one series per `(country_code, indicator)`.
//! Every series is filled independently on the rayon pool and the results are
//! written back afterwards, so no worker touches shared state.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::domain::{Indicator, MergedRecord};
use crate::math::{FillKind, fill_series};

/// Identity of one imputation unit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesKey {
    pub country_code: String,
    pub indicator: Indicator,
}

/// One cell of a series, pointing back at its row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub row: usize,
    pub year: i32,
    pub value: Option<f64>,
}

/// Cell counts by how each value was obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImputeStats {
    pub series: usize,
    pub observed: usize,
    pub interpolated: usize,
    pub carried: usize,
    /// Cells left null because their series had no observation at all.
    pub unresolved: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImputedRows {
    pub rows: Vec<MergedRecord>,
    pub stats: ImputeStats,
}

/// Split rows into year-ordered series keyed by country and indicator.
pub fn partition_series(rows: &[MergedRecord]) -> BTreeMap<SeriesKey, Vec<SeriesPoint>> {
    let mut series: BTreeMap<SeriesKey, Vec<SeriesPoint>> = BTreeMap::new();

    for (idx, row) in rows.iter().enumerate() {
        for (indicator, value) in row.values.iter() {
            series
                .entry(SeriesKey {
                    country_code: row.country_code.clone(),
                    indicator,
                })
                .or_default()
                .push(SeriesPoint {
                    row: idx,
                    year: row.year,
                    value,
                });
        }
    }

    for points in series.values_mut() {
        points.sort_by_key(|p| p.year);
    }
    series
}

/// Fill every indicator gap within each country's time series.
pub fn impute(rows: Vec<MergedRecord>) -> ImputedRows {
    let partitions: Vec<(SeriesKey, Vec<SeriesPoint>)> = partition_series(&rows).into_iter().collect();

    let filled: Vec<(Indicator, Vec<(usize, Option<f64>, FillKind)>)> = partitions
        .par_iter()
        .map(|(key, points)| {
            let series: Vec<(f64, Option<f64>)> = points.iter().map(|p| (f64::from(p.year), p.value)).collect();
            let cells: Vec<(usize, Option<f64>, FillKind)> = points
                .iter()
                .zip(fill_series(&series))
                .map(|(p, (value, kind))| (p.row, value, kind))
                .collect();
            (key.indicator, cells)
        })
        .collect();

    let mut rows = rows;
    let mut stats = ImputeStats {
        series: filled.len(),
        ..ImputeStats::default()
    };

    for (indicator, cells) in filled {
        for (row, value, kind) in cells {
            match kind {
                FillKind::Observed => stats.observed += 1,
                FillKind::Interpolated => stats.interpolated += 1,
                FillKind::Carried => stats.carried += 1,
                FillKind::Missing => stats.unresolved += 1,
            }
            rows[row].values.set(indicator, value);
        }
    }

    info!(
        series = stats.series,
        interpolated = stats.interpolated,
        carried = stats.carried,
        unresolved = stats.unresolved,
        "imputed gaps"
    );

    ImputedRows { rows, stats }
}
