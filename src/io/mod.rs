//! Input/output helpers.
//!
//! - raw CSV ingest (`ingest`) and per-source file conventions (`layout`)
//! - panel / metrics CSV export (`export`)
//! - run summary JSON (`summary`)
//! - atomic replace-on-success writes (`atomic`)

pub mod atomic;
pub mod export;
pub mod ingest;
pub mod layout;
pub mod summary;

pub use export::*;
pub use ingest::*;
pub use layout::*;
pub use summary::*;
