//! Shared domain types.
//!
//! Records flow through the pipeline by value: every stage takes the previous
//! stage's output and returns a new collection, so these types stay small and
//! cheap to clone.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::policy::{MIN_COMPLETENESS, MIN_COUNTRIES_PER_YEAR};

/// The fixed set of target indicators carried by every merged row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    GiniIndex,
    GdpPerCapita,
    GdpCurrent,
    GdpGrowth,
}

impl Indicator {
    pub const COUNT: usize = 4;

    /// Output column order.
    pub const ALL: [Indicator; Indicator::COUNT] = [
        Indicator::GiniIndex,
        Indicator::GdpPerCapita,
        Indicator::GdpCurrent,
        Indicator::GdpGrowth,
    ];

    pub fn index(self) -> usize {
        match self {
            Indicator::GiniIndex => 0,
            Indicator::GdpPerCapita => 1,
            Indicator::GdpCurrent => 2,
            Indicator::GdpGrowth => 3,
        }
    }

    /// Header used for this indicator in the output table.
    pub fn column_name(self) -> &'static str {
        match self {
            Indicator::GiniIndex => "Gini Index",
            Indicator::GdpPerCapita => "GDP_per_capita",
            Indicator::GdpCurrent => "GDP_current",
            Indicator::GdpGrowth => "GDP_growth",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Indicator::GiniIndex => "Gini index",
            Indicator::GdpPerCapita => "GDP per capita",
            Indicator::GdpCurrent => "GDP (current US$)",
            Indicator::GdpGrowth => "GDP growth (annual %)",
        }
    }
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One nullable value per target indicator, indexed by `Indicator::index`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndicatorValues([Option<f64>; Indicator::COUNT]);

impl IndicatorValues {
    pub fn get(&self, indicator: Indicator) -> Option<f64> {
        self.0[indicator.index()]
    }

    pub fn set(&mut self, indicator: Indicator, value: Option<f64>) {
        self.0[indicator.index()] = value;
    }

    /// Number of target indicators with a value.
    pub fn present_count(&self) -> usize {
        self.0.iter().filter(|v| v.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Indicator, Option<f64>)> + '_ {
        Indicator::ALL.iter().map(|&ind| (ind, self.get(ind)))
    }
}

/// A single (source row × year column) observation in long format.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub country_name: String,
    pub country_code: String,
    pub year: i32,
    pub value: Option<f64>,
    pub indicator: Indicator,
}

impl NormalizedRecord {
    pub fn key(&self) -> CountryYearKey {
        CountryYearKey::new(&self.country_code, self.year)
    }
}

/// Merge identity. The country name is display-only and never part of the key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CountryYearKey {
    pub country_code: String,
    pub year: i32,
}

impl CountryYearKey {
    pub fn new(country_code: &str, year: i32) -> Self {
        Self {
            country_code: country_code.to_string(),
            year,
        }
    }
}

/// One wide row per country-year after the outer join.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRecord {
    pub country_name: String,
    pub country_code: String,
    pub year: i32,
    pub decade: i32,
    pub values: IndicatorValues,
}

impl MergedRecord {
    pub fn new(country_name: &str, country_code: &str, year: i32) -> Self {
        Self {
            country_name: country_name.to_string(),
            country_code: country_code.to_string(),
            year,
            decade: decade(year),
            values: IndicatorValues::default(),
        }
    }

    /// Fraction of target indicators present on this row.
    pub fn completeness(&self) -> f64 {
        self.values.present_count() as f64 / Indicator::COUNT as f64
    }
}

/// Floor a year to its decade: 2007 -> 2000, 1999 -> 1990.
pub fn decade(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

/// Tunables for the pure pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    pub min_completeness: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_completeness: MIN_COMPLETENESS,
        }
    }
}

/// Where the four raw exports live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub gini: PathBuf,
    pub gdp_per_capita: PathBuf,
    pub gdp_current: PathBuf,
    pub gdp_growth: PathBuf,
}

impl SourcePaths {
    /// Default file names inside a raw data directory.
    pub fn in_dir(dir: &std::path::Path) -> Self {
        Self {
            gini: dir.join("ginidata.csv"),
            gdp_per_capita: dir.join("gdpcapita.csv"),
            gdp_current: dir.join("gdpcurrent.csv"),
            gdp_growth: dir.join("gdpgrowth.csv"),
        }
    }

    pub fn for_indicator(&self, indicator: Indicator) -> &std::path::Path {
        match indicator {
            Indicator::GiniIndex => &self.gini,
            Indicator::GdpPerCapita => &self.gdp_per_capita,
            Indicator::GdpCurrent => &self.gdp_current,
            Indicator::GdpGrowth => &self.gdp_growth,
        }
    }
}

/// Everything a `panel run` invocation needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub sources: SourcePaths,
    pub output: PathBuf,
    pub summary: Option<PathBuf>,
    pub metrics: Option<PathBuf>,
    pub pipeline: PipelineConfig,
    pub min_countries: usize,
    /// Worker threads for imputation; `0` keeps rayon's default.
    pub threads: usize,
}

impl RunConfig {
    pub fn new(sources: SourcePaths, output: PathBuf) -> Self {
        Self {
            sources,
            output,
            summary: None,
            metrics: None,
            pipeline: PipelineConfig::default(),
            min_countries: MIN_COUNTRIES_PER_YEAR,
            threads: 0,
        }
    }
}
