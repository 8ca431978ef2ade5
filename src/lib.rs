//! `econ-panel` library crate.
//!
//! The binary (`panel`) is a thin wrapper around this library so that:
//!
//! - every pipeline stage is testable without touching the filesystem
//! - file I/O stays at the edges (`io`), around pure stage functions (`panel`)
//! - the same stages can be driven from other front-ends later

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod panel;
pub mod report;
