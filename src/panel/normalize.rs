//! Wide-to-long reshaping of one raw source.
//!
//! Output order is row-major: every year of the first country, then every year
//! of the next. Cells that do not parse as numbers become `None`; only the
//! column layout itself can fail.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::domain::{Indicator, NormalizedRecord};
use crate::error::AppError;
use crate::io::ingest::RawIndicatorTable;
use crate::io::layout::{COUNTRY_CODE, COUNTRY_NAME, HeaderLayout, SourceSpec};

/// One source after reshaping, plus the bookkeeping needed for the run summary.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSource {
    pub indicator: Indicator,
    pub records: Vec<NormalizedRecord>,
    pub years: Vec<i32>,
    /// Data rows that were melted.
    pub rows: usize,
    /// Rows without a country code (export footers, blank lines with separators).
    pub skipped_rows: usize,
}

impl NormalizedSource {
    pub fn null_values(&self) -> usize {
        self.records.iter().filter(|r| r.value.is_none()).count()
    }

    pub fn year_range(&self) -> Option<(i32, i32)> {
        let min = self.years.iter().min()?;
        let max = self.years.iter().max()?;
        Some((*min, *max))
    }
}

/// Resolved column positions for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnPlan {
    name_idx: usize,
    code_idx: usize,
    years: Vec<(usize, i32)>,
}

/// Reshape a raw wide table into long-format records.
pub fn normalize_source(table: &RawIndicatorTable, spec: &SourceSpec) -> Result<NormalizedSource, AppError> {
    let plan = plan_columns(&table.headers, spec)?;
    let width = spec.expected_width();

    let mut records = Vec::with_capacity(table.rows.len() * plan.years.len());
    let mut rows = 0usize;
    let mut skipped_rows = 0usize;

    for row in &table.rows {
        // Fixed layouts ignore anything past the declared width.
        let row: &[String] = match width {
            Some(w) if row.len() > w => &row[..w],
            _ => row,
        };

        let code = cell(row, plan.code_idx);
        if code.is_empty() {
            skipped_rows += 1;
            continue;
        }
        let name = cell(row, plan.name_idx);

        for &(idx, year) in &plan.years {
            records.push(NormalizedRecord {
                country_name: name.to_string(),
                country_code: code.to_string(),
                year,
                value: parse_value(cell(row, idx)),
                indicator: spec.indicator,
            });
        }
        rows += 1;
    }

    if skipped_rows > 0 {
        warn!(
            source = spec.label(),
            skipped_rows, "rows without a country code were excluded"
        );
    }
    debug!(
        source = spec.label(),
        rows,
        years = plan.years.len(),
        records = records.len(),
        "normalized source"
    );

    Ok(NormalizedSource {
        indicator: spec.indicator,
        records,
        years: plan.years.iter().map(|&(_, y)| y).collect(),
        rows,
        skipped_rows,
    })
}

/// Drop a descriptive suffix from a header: `2007 [YR2007]` -> `2007`.
pub fn strip_header_suffix(header: &str) -> &str {
    match header.find('[') {
        Some(idx) => header[..idx].trim(),
        None => header.trim(),
    }
}

/// Numeric coercion for value cells. Anything unparsable or non-finite is null.
pub fn parse_value(raw: &str) -> Option<f64> {
    let v = raw.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

fn plan_columns(headers: &[String], spec: &SourceSpec) -> Result<ColumnPlan, AppError> {
    let stripped: Vec<&str> = headers.iter().map(|h| strip_header_suffix(h)).collect();
    let id_columns = spec.layout.id_columns();

    match &spec.layout {
        HeaderLayout::Labeled { .. } => {
            let find = |name: &str| {
                stripped
                    .iter()
                    .position(|h| h.eq_ignore_ascii_case(name))
                    .ok_or_else(|| AppError::schema(spec.label(), format!("missing identifier column `{name}`")))
            };

            let mut id_positions = HashSet::new();
            for &name in id_columns {
                id_positions.insert(find(name)?);
            }

            let mut years = Vec::new();
            for (idx, header) in stripped.iter().enumerate() {
                if id_positions.contains(&idx) {
                    continue;
                }
                let year = header.parse::<i32>().map_err(|_| {
                    AppError::schema(
                        spec.label(),
                        format!("column {} header '{}' is not a year", idx + 1, headers[idx]),
                    )
                })?;
                years.push((idx, year));
            }

            Ok(ColumnPlan {
                name_idx: find(COUNTRY_NAME)?,
                code_idx: find(COUNTRY_CODE)?,
                years,
            })
        }
        HeaderLayout::Fixed { first_year, last_year, .. } => {
            let width = spec.expected_width().unwrap_or(id_columns.len());
            if stripped.len() < width {
                return Err(AppError::schema(
                    spec.label(),
                    format!(
                        "expected {width} columns ({} identifiers + {first_year}..={last_year}), found {}",
                        id_columns.len(),
                        stripped.len()
                    ),
                ));
            }

            for (idx, expected) in id_columns.iter().enumerate() {
                if !stripped[idx].eq_ignore_ascii_case(expected) {
                    return Err(AppError::schema(
                        spec.label(),
                        format!(
                            "column {} should be `{expected}`, found '{}'",
                            idx + 1,
                            headers[idx]
                        ),
                    ));
                }
            }

            let position = |name: &str| id_columns.iter().position(|c| *c == name);
            let (Some(name_idx), Some(code_idx)) = (position(COUNTRY_NAME), position(COUNTRY_CODE)) else {
                return Err(AppError::schema(
                    spec.label(),
                    "layout does not declare country name and code columns",
                ));
            };

            let years = (*first_year..=*last_year)
                .enumerate()
                .map(|(offset, year)| (id_columns.len() + offset, year))
                .collect();

            Ok(ColumnPlan {
                name_idx,
                code_idx,
                years,
            })
        }
    }
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(|s| s.trim()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::parse_raw_table;

    fn table(text: &str, skip: usize) -> RawIndicatorTable {
        parse_raw_table(text, skip).unwrap()
    }

    #[test]
    fn strips_bracketed_suffix() {
        assert_eq!(strip_header_suffix("2007 [YR2007]"), "2007");
        assert_eq!(strip_header_suffix(" Country Code "), "Country Code");
    }

    #[test]
    fn value_coercion_never_fails() {
        assert_eq!(parse_value("42.5"), Some(42.5));
        assert_eq!(parse_value(" 3 "), Some(3.0));
        assert_eq!(parse_value(".."), None);
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("NaN"), None);
        assert_eq!(parse_value("inf"), None);
    }

    #[test]
    fn labeled_source_melts_every_row_and_year() {
        let raw = table(
            "Series Name,Series Code,Country Name,Country Code,2000 [YR2000],2001 [YR2001],2002 [YR2002]\n\
Gini index,SI.POV.GINI,Argentina,ARG,51.1,..,53.3\n\
Gini index,SI.POV.GINI,Brazil,BRA,58.4,58.1,\n",
            0,
        );
        let out = normalize_source(&raw, &SourceSpec::gini()).unwrap();

        assert_eq!(out.rows, 2);
        assert_eq!(out.years, vec![2000, 2001, 2002]);
        assert_eq!(out.records.len(), 6);

        let pairs: HashSet<(String, i32)> = out
            .records
            .iter()
            .map(|r| (r.country_code.clone(), r.year))
            .collect();
        for code in ["ARG", "BRA"] {
            for year in [2000, 2001, 2002] {
                assert!(pairs.contains(&(code.to_string(), year)));
            }
        }

        assert_eq!(out.records[1].value, None);
        assert_eq!(out.records[2].value, Some(53.3));
        assert_eq!(out.null_values(), 2);
        assert!(out.records.iter().all(|r| r.indicator == Indicator::GiniIndex));
    }

    #[test]
    fn labeled_source_skips_footer_rows() {
        let raw = table(
            "Series Name,Series Code,Country Name,Country Code,2010 [YR2010]\n\
Gini index,SI.POV.GINI,Chile,CHL,46.0\n\
,,,,\n\
Data from database: World Development Indicators,,,,\n",
            0,
        );
        let out = normalize_source(&raw, &SourceSpec::gini()).unwrap();
        assert_eq!(out.rows, 1);
        assert_eq!(out.skipped_rows, 2);
        assert_eq!(out.records.len(), 1);
    }

    #[test]
    fn unparsable_year_header_is_fatal() {
        let raw = table(
            "Series Name,Series Code,Country Name,Country Code,2010 [YR2010],Notes\n\
Gini index,SI.POV.GINI,Chile,CHL,46.0,x\n",
            0,
        );
        let err = normalize_source(&raw, &SourceSpec::gini()).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
        assert!(err.message().contains("Notes"));
    }

    #[test]
    fn missing_identifier_is_fatal() {
        let raw = table("Country Name,2010\nChile,46.0\n", 0);
        let err = normalize_source(&raw, &SourceSpec::gini()).unwrap_err();
        assert!(err.message().contains("Series Name"));
    }

    fn wdi_text(year_cols: usize, trailing: &str) -> String {
        let years: Vec<String> = (0..year_cols).map(|i| (1960 + i as i32).to_string()).collect();
        let values: Vec<String> = (0..year_cols).map(|i| format!("{}.5", i)).collect();
        format!(
            "\"Data Source\",\"World Development Indicators\",\n\n\"Last Updated Date\",\"2024-12-16\",\n\n\
Country Name,Country Code,Indicator Name,Indicator Code,{}{trailing}\n\
\"Korea, Rep.\",KOR,GDP per capita (current US$),NY.GDP.PCAP.CD,{}{trailing}\n",
            years.join(","),
            values.join(",")
        )
    }

    #[test]
    fn fixed_source_clips_trailing_columns() {
        let raw = table(&wdi_text(65, ",,extra"), 4);
        let spec = SourceSpec::wdi(Indicator::GdpPerCapita);
        let out = normalize_source(&raw, &spec).unwrap();

        assert_eq!(out.years.len(), 65);
        assert_eq!(out.year_range(), Some((1960, 2024)));
        assert_eq!(out.records.len(), 65);
        assert_eq!(out.records[0].country_name, "Korea, Rep.");
        assert_eq!(out.records[0].value, Some(0.5));
        assert_eq!(out.records[64].year, 2024);
        assert_eq!(out.records[64].value, Some(64.5));
    }

    #[test]
    fn fixed_source_too_narrow_is_fatal() {
        let raw = table(&wdi_text(30, ""), 4);
        let err = normalize_source(&raw, &SourceSpec::wdi(Indicator::GdpCurrent)).unwrap_err();
        assert!(err.message().contains("expected 69 columns"));
    }

    #[test]
    fn fixed_source_with_wrong_identifiers_is_fatal() {
        let text = wdi_text(65, "").replace("Indicator Name", "Region");
        let raw = table(&text, 4);
        let err = normalize_source(&raw, &SourceSpec::wdi(Indicator::GdpCurrent)).unwrap_err();
        assert!(err.message().contains("Indicator Name"));
    }
}
