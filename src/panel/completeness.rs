//! Row retention by completeness score.

use tracing::info;

use crate::domain::MergedRecord;
use crate::error::AppError;

/// Rows kept plus how many were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredRows {
    pub rows: Vec<MergedRecord>,
    pub dropped: usize,
}

/// Keep rows whose completeness score is at least `min_completeness`.
pub fn filter_complete(rows: Vec<MergedRecord>, min_completeness: f64) -> Result<FilteredRows, AppError> {
    if !(0.0..=1.0).contains(&min_completeness) {
        return Err(AppError::input(format!(
            "Completeness threshold must be within [0, 1], got {min_completeness}."
        )));
    }

    let total = rows.len();
    let rows: Vec<MergedRecord> = rows
        .into_iter()
        .filter(|row| row.completeness() >= min_completeness)
        .collect();
    let dropped = total - rows.len();

    info!(
        retained = rows.len(),
        dropped,
        threshold = min_completeness,
        "completeness filter"
    );

    Ok(FilteredRows { rows, dropped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Indicator;
    use crate::domain::policy::MIN_COMPLETENESS;

    fn row_with(year: i32, present: &[Indicator]) -> MergedRecord {
        let mut row = MergedRecord::new("Peru", "PER", year);
        for &ind in present {
            row.values.set(ind, Some(1.0));
        }
        row
    }

    #[test]
    fn half_complete_is_kept_quarter_is_dropped() {
        let rows = vec![
            row_with(2000, &[Indicator::GiniIndex, Indicator::GdpGrowth]),
            row_with(2001, &[Indicator::GdpCurrent]),
            row_with(2002, &Indicator::ALL),
            row_with(2003, &[]),
        ];
        let out = filter_complete(rows, MIN_COMPLETENESS).unwrap();
        let years: Vec<i32> = out.rows.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2000, 2002]);
        assert_eq!(out.dropped, 2);
    }

    #[test]
    fn zero_threshold_keeps_everything() {
        let rows = vec![row_with(2000, &[]), row_with(2001, &[Indicator::GiniIndex])];
        let out = filter_complete(rows, 0.0).unwrap();
        assert_eq!(out.rows.len(), 2);
        assert_eq!(out.dropped, 0);
    }

    #[test]
    fn threshold_outside_unit_interval_is_rejected() {
        assert!(filter_complete(Vec::new(), 1.5).is_err());
        assert!(filter_complete(Vec::new(), f64::NAN).is_err());
    }
}
