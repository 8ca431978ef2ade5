//! Empirically chosen thresholds.
//!
//! None of these come with a derivation; they are kept as named values so every
//! caller can override them (see the `--min-completeness` / `--min-countries`
//! flags) instead of re-hardcoding the numbers.

/// Minimum fraction of target indicators a merged row needs to be kept.
pub const MIN_COMPLETENESS: f64 = 0.5;

/// Years with fewer rows than this are skipped by the yearly inequality metrics.
pub const MIN_COUNTRIES_PER_YEAR: usize = 10;

/// First and last year columns in the World Bank WDI bulk exports.
pub const WDI_FIRST_YEAR: i32 = 1960;
pub const WDI_LAST_YEAR: i32 = 2024;

/// Metadata lines ("Data Source", "Last Updated Date", ...) ahead of the WDI header.
pub const WDI_PREAMBLE_LINES: usize = 4;
