//! Per-source file conventions.
//!
//! The raw exports come in two shapes:
//!
//! - **labeled**: the header row names the identifier columns and every other
//!   column is a year (possibly suffixed, e.g. `2007 [YR2007]`)
//! - **fixed**: a metadata preamble, then a header whose year columns are assumed
//!   to span a known range; rows are clipped to that width and the headers are
//!   assigned rather than trusted

use crate::domain::Indicator;
use crate::domain::policy::{WDI_FIRST_YEAR, WDI_LAST_YEAR, WDI_PREAMBLE_LINES};

pub const COUNTRY_NAME: &str = "Country Name";
pub const COUNTRY_CODE: &str = "Country Code";

const GINI_ID_COLUMNS: [&str; 4] = ["Series Name", "Series Code", COUNTRY_NAME, COUNTRY_CODE];
const WDI_ID_COLUMNS: [&str; 4] = [COUNTRY_NAME, COUNTRY_CODE, "Indicator Name", "Indicator Code"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderLayout {
    Labeled {
        id_columns: Vec<&'static str>,
    },
    Fixed {
        id_columns: Vec<&'static str>,
        first_year: i32,
        last_year: i32,
    },
}

impl HeaderLayout {
    pub fn id_columns(&self) -> &[&'static str] {
        match self {
            HeaderLayout::Labeled { id_columns } | HeaderLayout::Fixed { id_columns, .. } => id_columns,
        }
    }
}

/// How to read one raw indicator export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub indicator: Indicator,
    /// Lines dropped before the header row.
    pub skip_lines: usize,
    pub layout: HeaderLayout,
}

impl SourceSpec {
    /// World Bank DataBank export for the Gini index.
    pub fn gini() -> Self {
        Self {
            indicator: Indicator::GiniIndex,
            skip_lines: 0,
            layout: HeaderLayout::Labeled {
                id_columns: GINI_ID_COLUMNS.to_vec(),
            },
        }
    }

    /// World Bank WDI bulk download (`API_<code>_DS2_en_csv_*.csv`).
    pub fn wdi(indicator: Indicator) -> Self {
        Self {
            indicator,
            skip_lines: WDI_PREAMBLE_LINES,
            layout: HeaderLayout::Fixed {
                id_columns: WDI_ID_COLUMNS.to_vec(),
                first_year: WDI_FIRST_YEAR,
                last_year: WDI_LAST_YEAR,
            },
        }
    }

    /// The layout each indicator's raw file ships in.
    pub fn for_indicator(indicator: Indicator) -> Self {
        match indicator {
            Indicator::GiniIndex => Self::gini(),
            other => Self::wdi(other),
        }
    }

    /// Total column count for fixed layouts (identifiers + year range).
    pub fn expected_width(&self) -> Option<usize> {
        match &self.layout {
            HeaderLayout::Labeled { .. } => None,
            HeaderLayout::Fixed {
                id_columns,
                first_year,
                last_year,
            } => Some(id_columns.len() + (last_year - first_year + 1).max(0) as usize),
        }
    }

    pub fn label(&self) -> &'static str {
        self.indicator.column_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wdi_width_covers_ids_and_years() {
        let spec = SourceSpec::wdi(Indicator::GdpGrowth);
        assert_eq!(spec.expected_width(), Some(4 + 65));
        assert_eq!(spec.skip_lines, 4);
    }

    #[test]
    fn gini_is_labeled_without_preamble() {
        let spec = SourceSpec::for_indicator(Indicator::GiniIndex);
        assert_eq!(spec.skip_lines, 0);
        assert_eq!(spec.expected_width(), None);
        assert!(spec.layout.id_columns().contains(&COUNTRY_CODE));
    }
}
