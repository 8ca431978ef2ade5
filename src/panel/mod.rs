//! The integration stages, in data-flow order:
//!
//! normalize -> merge -> completeness filter -> impute
//!
//! Each stage is a plain function from its input to a new value; the
//! composition lives in `app::pipeline`.

pub mod completeness;
pub mod impute;
pub mod merge;
pub mod normalize;

pub use completeness::{FilteredRows, filter_complete};
pub use impute::{ImputeStats, ImputedRows, SeriesKey, SeriesPoint, impute, partition_series};
pub use merge::{MergedTable, merge_sources};
pub use normalize::{NormalizedSource, normalize_source, parse_value, strip_header_suffix};
