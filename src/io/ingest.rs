//! Raw CSV ingest.
//!
//! This module only turns bytes into a `RawIndicatorTable` (header + string
//! cells). Interpreting the columns is the normalizer's job, so nothing here
//! knows about years or indicators.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::AppError;
use crate::io::layout::SourceSpec;

/// One source's raw wide table, exactly as read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawIndicatorTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read a raw export from disk using the source's preamble convention.
pub fn load_raw_table(path: &Path, spec: &SourceSpec) -> Result<RawIndicatorTable, AppError> {
    let text = fs::read_to_string(path).map_err(|e| {
        AppError::input(format!(
            "Failed to read {} source '{}': {e}",
            spec.label(),
            path.display()
        ))
    })?;

    let table = parse_raw_table(&text, spec.skip_lines)
        .map_err(|e| AppError::input(format!("Invalid CSV in '{}': {e}", path.display())))?;

    debug!(
        source = spec.label(),
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "loaded raw table"
    );
    Ok(table)
}

/// Parse CSV text into a raw table after dropping `skip_lines` preamble lines.
pub fn parse_raw_table(text: &str, skip_lines: usize) -> Result<RawIndicatorTable, String> {
    // Excel-style exports put a BOM in front of the first line; strip it before
    // counting preamble lines so header matching sees clean names.
    let text = text.trim_start_matches('\u{feff}');
    let body = skip_preamble(text, skip_lines);

    // Preamble lines are counted physically (blank lines included), which is why
    // they are cut here rather than by skipping CSV records: the csv reader drops
    // blank lines on its own.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(Ok(record)) => record.iter().map(|cell| cell.trim().to_string()).collect(),
        Some(Err(e)) => return Err(format!("failed to read header row: {e}")),
        None => return Err(format!("no header row after skipping {skip_lines} line(s)")),
    };

    let mut rows = Vec::new();
    for (idx, result) in records.enumerate() {
        let record = result.map_err(|e| format!("CSV parse error at data row {}: {e}", idx + 1))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawIndicatorTable { headers, rows })
}

fn skip_preamble(text: &str, lines: usize) -> &str {
    let mut rest = text;
    for _ in 0..lines {
        match rest.find('\n') {
            Some(idx) => rest = &rest[idx + 1..],
            None => return "",
        }
    }
    rest
}
