//! Reporting: run summaries, yearly inequality metrics, and terminal formatting.

pub mod format;
pub mod metrics;
pub mod summary;

pub use format::*;
pub use metrics::*;
pub use summary::*;
