//! Top-level application orchestration.
//!
//! `src/main.rs` only maps errors to exit codes; this module:
//! - loads `.env` and parses CLI arguments
//! - initialises logging
//! - runs the pipeline and prints the summary
//! - persists outputs, only after every stage succeeded

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, MetricsArgs, RunArgs};
use crate::domain::{RunConfig, SourcePaths};
use crate::error::{AppError, EXIT_NO_DATA};
use crate::io::atomic::commit_all;

pub mod pipeline;

/// Entry point for the `panel` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Run(args) => handle_run(&run_config_from_args(&args)),
        Command::Metrics(args) => handle_metrics(&args),
    }
}

/// Log to stderr so stdout only carries the report.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Keeps an already-installed subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_run(config: &RunConfig) -> Result<(), AppError> {
    let run = if config.threads > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()
            .map_err(|e| AppError::input(format!("Failed to start {} worker threads: {e}", config.threads)))?;
        pool.install(|| pipeline::run_from_files(&config.sources, &config.pipeline))?
    } else {
        pipeline::run_from_files(&config.sources, &config.pipeline)?
    };

    println!("{}", crate::report::format_run_summary(&run.summary));

    if run.rows.is_empty() {
        return Err(AppError::new(
            EXIT_NO_DATA,
            "No country-year rows meet the completeness threshold; nothing written.",
        ));
    }

    // Every output is staged before any is committed; the panel goes last.
    let mut staged = Vec::new();
    if let Some(path) = &config.summary {
        staged.push(crate::io::summary::stage_summary_json(path, &run.summary)?);
    }
    if let Some(path) = &config.metrics {
        let metrics = crate::report::yearly_inequality_metrics(&run.rows, config.min_countries);
        info!(years = metrics.len(), "computed yearly metrics");
        staged.push(crate::io::export::stage_metrics_csv(path, &metrics)?);
    }
    staged.push(crate::io::export::stage_panel_csv(&config.output, &run.rows)?);

    let targets: Vec<String> = staged.iter().map(|f| f.target().display().to_string()).collect();
    commit_all(staged)?;
    info!(rows = run.rows.len(), outputs = ?targets, "wrote outputs");

    Ok(())
}

fn handle_metrics(args: &MetricsArgs) -> Result<(), AppError> {
    let rows = crate::io::export::read_panel_csv(&args.panel)?;
    let metrics = crate::report::yearly_inequality_metrics(&rows, args.min_countries);
    if metrics.is_empty() {
        return Err(AppError::new(
            EXIT_NO_DATA,
            format!("No year has at least {} rows in '{}'.", args.min_countries, args.panel.display()),
        ));
    }

    println!("{}", crate::report::format_metrics(&metrics));

    if let Some(path) = &args.output {
        crate::io::export::write_metrics_csv(path, &metrics)?;
        info!(path = %path.display(), years = metrics.len(), "wrote yearly metrics");
    }
    Ok(())
}

pub fn run_config_from_args(args: &RunArgs) -> RunConfig {
    let defaults = SourcePaths::in_dir(&args.data_dir);
    let sources = SourcePaths {
        gini: args.gini.clone().unwrap_or(defaults.gini),
        gdp_per_capita: args.gdp_per_capita.clone().unwrap_or(defaults.gdp_per_capita),
        gdp_current: args.gdp_current.clone().unwrap_or(defaults.gdp_current),
        gdp_growth: args.gdp_growth.clone().unwrap_or(defaults.gdp_growth),
    };

    let mut config = RunConfig::new(sources, args.output.clone());
    config.summary = args.summary.clone();
    config.metrics = args.metrics.clone();
    config.pipeline.min_completeness = args.min_completeness;
    config.min_countries = args.min_countries;
    config.threads = args.threads;
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};

    use crate::error::{EXIT_INPUT, EXIT_OUTPUT};

    const GINI: &str = "Series Name,Series Code,Country Name,Country Code,2000 [YR2000],2001 [YR2001]\n\
Gini index,SI.POV.GINI,Argentina,ARG,50.0,..\n";

    fn wdi(id_header: &str, values: &[(i32, f64)]) -> String {
        let years: Vec<String> = (1960..=2024).map(|y| y.to_string()).collect();
        let cells: Vec<String> = (1960..=2024)
            .map(|y| {
                values
                    .iter()
                    .find(|(vy, _)| *vy == y)
                    .map(|(_, v)| v.to_string())
                    .unwrap_or_default()
            })
            .collect();
        format!(
            "\"Data Source\",\"WDI\",\n\n\"Last Updated Date\",\"2024-12-16\",\n\n\
{id_header},{},\n\
\"Argentina\",\"ARG\",\"Some indicator\",\"X.Y.Z\",{},\n",
            years.join(","),
            cells.join(",")
        )
    }

    const WDI_IDS: &str = "\"Country Name\",\"Country Code\",\"Indicator Name\",\"Indicator Code\"";

    /// Write the four raw exports into `dir/raw`, with ARG observed in 2000 and 2001.
    fn raw_sources(dir: &Path, gdp_values: &[(i32, f64)]) -> SourcePaths {
        let raw = dir.join("raw");
        fs::create_dir_all(&raw).unwrap();
        let paths = SourcePaths::in_dir(&raw);
        fs::write(&paths.gini, GINI).unwrap();
        for path in [&paths.gdp_per_capita, &paths.gdp_current, &paths.gdp_growth] {
            fs::write(path, wdi(WDI_IDS, gdp_values)).unwrap();
        }
        paths
    }

    const FULL: &[(i32, f64)] = &[(2000, 1.5), (2001, 1.5)];

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn run_writes_every_requested_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let mut config = RunConfig::new(raw_sources(dir.path(), FULL), out.join("panel.csv"));
        config.summary = Some(out.join("summary.json"));
        config.metrics = Some(out.join("metrics.csv"));
        config.min_countries = 1;
        config.threads = 2;

        // A scoped pool can be built again in the same process.
        handle_run(&config).unwrap();
        handle_run(&config).unwrap();

        let rows = crate::io::export::read_panel_csv(&config.output).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].values.get(crate::domain::Indicator::GiniIndex), Some(50.0));
        assert_eq!(entries(&out), vec!["metrics.csv", "panel.csv", "summary.json"]);
        assert_eq!(fs::read_to_string(out.join("metrics.csv")).unwrap().lines().count(), 3);
    }

    #[test]
    fn empty_result_exits_no_data_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let mut config = RunConfig::new(raw_sources(dir.path(), &[]), out.join("panel.csv"));
        config.summary = Some(out.join("summary.json"));

        let err = handle_run(&config).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_NO_DATA);
        assert!(!out.exists());
    }

    #[test]
    fn schema_mismatch_leaves_existing_panel_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("panel.csv"), "old").unwrap();

        let sources = raw_sources(dir.path(), FULL);
        fs::write(&sources.gdp_current, wdi("\"Country\",\"Code\",\"Indicator Name\",\"Indicator Code\"", FULL)).unwrap();
        let config = RunConfig::new(sources, out.join("panel.csv"));

        let err = handle_run(&config).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT);
        assert_eq!(fs::read_to_string(out.join("panel.csv")).unwrap(), "old");
        assert_eq!(entries(&out), vec!["panel.csv"]);
    }

    #[test]
    fn failed_side_output_keeps_previous_panel() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("panel.csv"), "old").unwrap();
        fs::write(out.join("blocker"), "").unwrap();

        let mut config = RunConfig::new(raw_sources(dir.path(), FULL), out.join("panel.csv"));
        config.summary = Some(out.join("summary.json"));
        config.metrics = Some(out.join("blocker").join("metrics.csv"));

        let err = handle_run(&config).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_OUTPUT);
        assert_eq!(fs::read_to_string(out.join("panel.csv")).unwrap(), "old");
        assert_eq!(entries(&out), vec!["blocker", "panel.csv"]);
    }

    #[test]
    fn source_overrides_replace_data_dir_defaults() {
        let cli = Cli::parse_from([
            "panel",
            "run",
            "--data-dir",
            "raw",
            "--gini",
            "elsewhere/gini.csv",
            "--min-completeness",
            "0.75",
        ]);
        let Command::Run(args) = cli.command else {
            panic!("expected run subcommand");
        };
        let config = run_config_from_args(&args);

        assert_eq!(config.sources.gini, PathBuf::from("elsewhere/gini.csv"));
        assert_eq!(config.sources.gdp_growth, PathBuf::from("raw/gdpgrowth.csv"));
        assert!((config.pipeline.min_completeness - 0.75).abs() < 1e-12);
        assert_eq!(config.min_countries, 10);
    }

    #[test]
    fn verbosity_is_global() {
        let cli = Cli::parse_from(["panel", "metrics", "-vv", "--panel", "p.csv"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Metrics(_)));
    }
}
