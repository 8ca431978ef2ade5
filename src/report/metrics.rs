//! Cross-country inequality metrics per year, computed from a finished panel.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Indicator, MergedRecord};
use crate::math::{mean, percentile, sample_std};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyMetrics {
    pub year: i32,
    pub countries_count: usize,
    /// Sample std / mean of GDP per capita; only defined when the mean is positive.
    pub gdp_coefficient_variation: Option<f64>,
    pub avg_gini_index: Option<f64>,
    /// P90 / P10 of GDP per capita; only defined when P10 is positive.
    pub gdp_p90_p10_ratio: Option<f64>,
}

/// One entry per year that has at least `min_countries` rows, in year order.
pub fn yearly_inequality_metrics(rows: &[MergedRecord], min_countries: usize) -> Vec<YearlyMetrics> {
    let mut by_year: BTreeMap<i32, Vec<&MergedRecord>> = BTreeMap::new();
    for row in rows {
        by_year.entry(row.year).or_default().push(row);
    }

    let mut out = Vec::new();
    for (year, year_rows) in by_year {
        if year_rows.len() < min_countries {
            debug!(year, rows = year_rows.len(), min_countries, "skipping thin year");
            continue;
        }

        let gdp = observed(&year_rows, Indicator::GdpPerCapita);
        let gini = observed(&year_rows, Indicator::GiniIndex);

        let gdp_mean = mean(&gdp);
        let gdp_coefficient_variation = match (sample_std(&gdp), gdp_mean) {
            (Some(sd), Some(m)) if m > 0.0 => Some(sd / m),
            _ => None,
        };

        let gdp_p90_p10_ratio = match (percentile(&gdp, 90.0), percentile(&gdp, 10.0)) {
            (Some(p90), Some(p10)) if p10 > 0.0 => Some(p90 / p10),
            _ => None,
        };

        out.push(YearlyMetrics {
            year,
            countries_count: year_rows.len(),
            gdp_coefficient_variation,
            avg_gini_index: mean(&gini),
            gdp_p90_p10_ratio,
        });
    }
    out
}

fn observed(rows: &[&MergedRecord], indicator: Indicator) -> Vec<f64> {
    rows.iter().filter_map(|r| r.values.get(indicator)).collect()
}
