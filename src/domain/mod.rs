//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the fixed indicator set (`Indicator`) and per-row values (`IndicatorValues`)
//! - long-format observations (`NormalizedRecord`) and merged rows (`MergedRecord`)
//! - run configuration (`RunConfig`, `PipelineConfig`) and policy constants

pub mod policy;
pub mod types;

pub use types::*;
