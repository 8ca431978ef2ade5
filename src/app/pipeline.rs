//! The integration pipeline, composed from the `panel` stages.
//!
//! normalize (per source) -> merge -> completeness filter -> impute
//!
//! `run_pipeline` is pure: it takes already-read raw tables and returns the
//! finished panel plus a summary. `run_from_files` is the thin caller that does
//! the reading. Nothing here writes; persisting is the caller's job, after
//! everything succeeded.

use std::collections::HashSet;

use chrono::Utc;
use tracing::info;

use crate::domain::{Indicator, MergedRecord, PipelineConfig, SourcePaths};
use crate::error::AppError;
use crate::io::ingest::{RawIndicatorTable, load_raw_table};
use crate::io::layout::SourceSpec;
use crate::panel::{filter_complete, impute, merge_sources, normalize_source};
use crate::report::summary::{RunSummary, SourceStats};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub rows: Vec<MergedRecord>,
    pub summary: RunSummary,
}

/// Run every stage over raw tables that are already in memory.
pub fn run_pipeline(
    tables: &[(SourceSpec, RawIndicatorTable)],
    config: &PipelineConfig,
) -> Result<PipelineOutput, AppError> {
    // 1) Normalize each source. Any schema mismatch aborts the whole run.
    let normalized = tables
        .iter()
        .map(|(spec, table)| normalize_source(table, spec))
        .collect::<Result<Vec<_>, _>>()?;
    let sources: Vec<SourceStats> = normalized.iter().map(SourceStats::from_normalized).collect();

    // 2) Outer-join on (country_code, year).
    let merged = merge_sources(&normalized)?;
    let merged_rows = merged.rows.len();

    // 3) Drop rows with too few indicators.
    let filtered = filter_complete(merged.rows, config.min_completeness)?;

    // 4) Close gaps within each country's series.
    let imputed = impute(filtered.rows);

    let countries = imputed
        .rows
        .iter()
        .map(|r| r.country_code.as_str())
        .collect::<HashSet<_>>()
        .len();

    let summary = RunSummary {
        generated_at: Utc::now(),
        min_completeness: config.min_completeness,
        sources,
        merged_rows,
        duplicate_keys: merged.duplicate_keys,
        retained_rows: imputed.rows.len(),
        dropped_rows: filtered.dropped,
        countries,
        imputation: imputed.stats,
    };

    info!(
        retained = summary.retained_rows,
        dropped = summary.dropped_rows,
        countries,
        "pipeline finished"
    );

    Ok(PipelineOutput {
        rows: imputed.rows,
        summary,
    })
}

/// Read the four raw exports and run the pipeline over them.
pub fn run_from_files(paths: &SourcePaths, config: &PipelineConfig) -> Result<PipelineOutput, AppError> {
    let tables = Indicator::ALL
        .iter()
        .map(|&indicator| {
            let spec = SourceSpec::for_indicator(indicator);
            let table = load_raw_table(paths.for_indicator(indicator), &spec)?;
            Ok((spec, table))
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    run_pipeline(&tables, config)
}
