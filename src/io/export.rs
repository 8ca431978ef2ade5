//! Export (and re-read) the integrated panel and the yearly metrics as CSV.
//!
//! The panel CSV is the contract with downstream consumers: one row per
//! retained country-year, nulls as empty cells.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{Indicator, MergedRecord};
use crate::error::AppError;
use crate::io::atomic::{StagedFile, stage_file, write_atomically};
use crate::report::metrics::YearlyMetrics;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PanelRow {
    #[serde(rename = "Country Name")]
    country_name: String,
    #[serde(rename = "Country Code")]
    country_code: String,
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Gini Index")]
    gini_index: Option<f64>,
    #[serde(rename = "GDP_per_capita")]
    gdp_per_capita: Option<f64>,
    #[serde(rename = "GDP_current")]
    gdp_current: Option<f64>,
    #[serde(rename = "GDP_growth")]
    gdp_growth: Option<f64>,
    #[serde(rename = "Decade")]
    decade: i32,
}

impl From<&MergedRecord> for PanelRow {
    fn from(r: &MergedRecord) -> Self {
        Self {
            country_name: r.country_name.clone(),
            country_code: r.country_code.clone(),
            year: r.year,
            gini_index: r.values.get(Indicator::GiniIndex),
            gdp_per_capita: r.values.get(Indicator::GdpPerCapita),
            gdp_current: r.values.get(Indicator::GdpCurrent),
            gdp_growth: r.values.get(Indicator::GdpGrowth),
            decade: r.decade,
        }
    }
}

impl PanelRow {
    fn into_record(self) -> MergedRecord {
        let mut record = MergedRecord::new(&self.country_name, &self.country_code, self.year);
        record.decade = self.decade;
        record.values.set(Indicator::GiniIndex, self.gini_index);
        record.values.set(Indicator::GdpPerCapita, self.gdp_per_capita);
        record.values.set(Indicator::GdpCurrent, self.gdp_current);
        record.values.set(Indicator::GdpGrowth, self.gdp_growth);
        record
    }
}

/// Stage the panel table next to `path`; nothing is replaced until commit.
pub fn stage_panel_csv(path: &Path, rows: &[MergedRecord]) -> Result<StagedFile, AppError> {
    stage_file(path, |file| write_panel(file, rows))
}

/// Serialize panel rows to any writer.
pub fn write_panel<W: std::io::Write>(writer: W, rows: &[MergedRecord]) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(PanelRow::from(row))
            .map_err(|e| AppError::output(format!("Failed to write panel row: {e}")))?;
    }
    // An empty panel still gets its header so consumers see the schema.
    if rows.is_empty() {
        wtr.write_record(panel_header())
            .map_err(|e| AppError::output(format!("Failed to write panel header: {e}")))?;
    }
    wtr.flush()
        .map_err(|e| AppError::output(format!("Failed to flush panel CSV: {e}")))?;
    Ok(())
}

/// Read a panel CSV written by `stage_panel_csv`.
pub fn read_panel_csv(path: &Path) -> Result<Vec<MergedRecord>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open panel CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<PanelRow>().enumerate() {
        // +2: 1-based lines, plus the header
        let row = result.map_err(|e| {
            AppError::input(format!("Invalid panel row at line {} of '{}': {e}", idx + 2, path.display()))
        })?;
        rows.push(row.into_record());
    }
    Ok(rows)
}

/// Write yearly inequality metrics.
pub fn write_metrics_csv(path: &Path, metrics: &[YearlyMetrics]) -> Result<(), AppError> {
    write_atomically(path, |file| write_metrics(file, metrics))
}

pub fn stage_metrics_csv(path: &Path, metrics: &[YearlyMetrics]) -> Result<StagedFile, AppError> {
    stage_file(path, |file| write_metrics(file, metrics))
}

fn write_metrics<W: std::io::Write>(writer: W, metrics: &[YearlyMetrics]) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for m in metrics {
        wtr.serialize(m)
            .map_err(|e| AppError::output(format!("Failed to write metrics row: {e}")))?;
    }
    wtr.flush()
        .map_err(|e| AppError::output(format!("Failed to flush metrics CSV: {e}")))?;
    Ok(())
}

fn panel_header() -> Vec<&'static str> {
    let mut header = vec!["Country Name", "Country Code", "Year"];
    header.extend(Indicator::ALL.iter().map(|i| i.column_name()));
    header.push("Decade");
    header
}
