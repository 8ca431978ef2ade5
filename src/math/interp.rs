//! Gap filling for a single ordered series.
//!
//! Interpolation runs on the x values themselves (years, in this crate), so a
//! gap of five years moves five times as far along the line as a gap of one.

/// How a value in a filled series was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillKind {
    Observed,
    /// Linear between the nearest known points on both sides.
    Interpolated,
    /// Before the first or after the last known point: nearest known value.
    Carried,
    /// The series had no known values at all.
    Missing,
}

/// Fill `None`s in `points`, which must be sorted by x ascending.
///
/// Internal gaps are interpolated linearly in x; leading and trailing gaps take
/// the nearest known value. A series with no known value is returned untouched.
pub fn fill_series(points: &[(f64, Option<f64>)]) -> Vec<(Option<f64>, FillKind)> {
    // (position, x, y) of every observed point.
    let known: Vec<(usize, f64, f64)> = points
        .iter()
        .enumerate()
        .filter_map(|(i, &(x, y))| y.map(|v| (i, x, v)))
        .collect();

    let (Some(&first), Some(&last)) = (known.first(), known.last()) else {
        return vec![(None, FillKind::Missing); points.len()];
    };

    let mut out = Vec::with_capacity(points.len());
    // Index into `known` of the nearest observed point at or after the cursor.
    let mut next = 0usize;

    for (i, &(x, y)) in points.iter().enumerate() {
        if let Some(v) = y {
            out.push((Some(v), FillKind::Observed));
            next += 1;
            continue;
        }

        if i < first.0 {
            out.push((Some(first.2), FillKind::Carried));
        } else if i > last.0 {
            out.push((Some(last.2), FillKind::Carried));
        } else {
            let (_, x0, y0) = known[next - 1];
            let (_, x1, y1) = known[next];
            out.push((Some(lerp(x0, y0, x1, y1, x)), FillKind::Interpolated));
        }
    }

    out
}

fn lerp(x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
    let span = x1 - x0;
    if span.abs() < f64::EPSILON {
        return y0;
    }
    y0 + (y1 - y0) * (x - x0) / span
}
