//! Numeric utilities: series gap filling and descriptive statistics.

pub mod interp;
pub mod stats;

pub use interp::*;
pub use stats::*;
