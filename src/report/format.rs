//! Terminal formatting for run summaries and yearly metrics.
//!
//! Formatting stays here so the pipeline code never prints.

use crate::report::metrics::YearlyMetrics;
use crate::report::summary::RunSummary;

/// Format the run summary: per-source ingest counts, then stage counts.
pub fn format_run_summary(summary: &RunSummary) -> String {
    let mut out = String::new();

    out.push_str("=== panel - indicator integration ===\n");
    out.push_str(&format!("Generated: {}\n", summary.generated_at.to_rfc3339()));

    out.push_str("\nSources:\n");
    for s in &summary.sources {
        let years = match (s.first_year, s.last_year) {
            (Some(lo), Some(hi)) => format!("{lo}..={hi}"),
            _ => "-".to_string(),
        };
        out.push_str(&format!(
            "  {:<24} rows={:<5} years={:<11} records={:<7} null={:<7}",
            s.indicator.display_name(),
            s.rows,
            years,
            s.records,
            s.null_values,
        ));
        if s.skipped_rows > 0 {
            out.push_str(&format!(" skipped={}", s.skipped_rows));
        }
        out.push('\n');
    }

    out.push_str("\nPipeline:\n");
    out.push_str(&format!("  merged rows:     {}\n", summary.merged_rows));
    if summary.duplicate_keys > 0 {
        out.push_str(&format!("  duplicate keys:  {}\n", summary.duplicate_keys));
    }
    out.push_str(&format!(
        "  retained rows:   {} (completeness >= {:.2}, dropped {})\n",
        summary.retained_rows, summary.min_completeness, summary.dropped_rows
    ));
    out.push_str(&format!("  countries:       {}\n", summary.countries));

    let imp = &summary.imputation;
    out.push_str(&format!(
        "  imputation:      {} series | interpolated={} carried={} unresolved={}\n",
        imp.series, imp.interpolated, imp.carried, imp.unresolved
    ));

    out
}

/// Format yearly metrics as a fixed-width table.
pub fn format_metrics(metrics: &[YearlyMetrics]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>6} {:>9} {:>10} {:>10} {:>10}\n",
        "year", "countries", "gdp_cv", "avg_gini", "p90/p10"
    ));
    for m in metrics {
        out.push_str(&format!(
            "{:>6} {:>9} {:>10} {:>10} {:>10}\n",
            m.year,
            m.countries_count,
            fmt_opt(m.gdp_coefficient_variation),
            fmt_opt(m.avg_gini_index),
            fmt_opt(m.gdp_p90_p10_ratio),
        ));
    }
    out
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.3}"),
        _ => "-".to_string(),
    }
}
