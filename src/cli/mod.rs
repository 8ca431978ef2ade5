//! Command-line parsing for the panel integration tool.
//!
//! Argument parsing stays separate from the pipeline code; `app` maps these
//! structs onto `RunConfig`.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::policy::{MIN_COMPLETENESS, MIN_COUNTRIES_PER_YEAR};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "panel", version, about = "Merge and gap-fill country-year macroeconomic indicators")]
pub struct Cli {
    /// More log output (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Normalize, merge, filter and impute the raw exports into one panel CSV.
    Run(RunArgs),
    /// Compute yearly inequality metrics from an existing panel CSV.
    Metrics(MetricsArgs),
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Directory holding ginidata.csv, gdpcapita.csv, gdpcurrent.csv and gdpgrowth.csv.
    #[arg(long, env = "PANEL_DATA_DIR", default_value = "data/raw")]
    pub data_dir: PathBuf,

    /// Gini export (overrides the file in --data-dir).
    #[arg(long)]
    pub gini: Option<PathBuf>,

    /// GDP per capita export (overrides the file in --data-dir).
    #[arg(long)]
    pub gdp_per_capita: Option<PathBuf>,

    /// GDP (current US$) export (overrides the file in --data-dir).
    #[arg(long)]
    pub gdp_current: Option<PathBuf>,

    /// GDP growth export (overrides the file in --data-dir).
    #[arg(long)]
    pub gdp_growth: Option<PathBuf>,

    /// Output panel CSV.
    #[arg(short, long, env = "PANEL_OUTPUT", default_value = "global_economic_data.csv")]
    pub output: PathBuf,

    /// Minimum fraction of the four indicators a row needs to be kept.
    #[arg(long, default_value_t = MIN_COMPLETENESS)]
    pub min_completeness: f64,

    /// Also write a run summary as JSON.
    #[arg(long, value_name = "JSON")]
    pub summary: Option<PathBuf>,

    /// Also write yearly inequality metrics as CSV.
    #[arg(long, value_name = "CSV")]
    pub metrics: Option<PathBuf>,

    /// Minimum rows per year for the metrics output.
    #[arg(long, default_value_t = MIN_COUNTRIES_PER_YEAR)]
    pub min_countries: usize,

    /// Worker threads for imputation (0 = one per core).
    #[arg(long, env = "PANEL_THREADS", default_value_t = 0)]
    pub threads: usize,
}

#[derive(Debug, Args, Clone)]
pub struct MetricsArgs {
    /// Panel CSV produced by `panel run`.
    #[arg(long, value_name = "CSV", env = "PANEL_OUTPUT", default_value = "global_economic_data.csv")]
    pub panel: PathBuf,

    /// Write the metrics as CSV instead of only printing them.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Minimum rows per year; thinner years are skipped.
    #[arg(long, default_value_t = MIN_COUNTRIES_PER_YEAR)]
    pub min_countries: usize,
}
