//! Numeric coercion, unit conversion and interpolation helpers.
//!
//! This module provides the pure numeric building blocks of the analyzer:
//! - Row-wise coercion of raw string tables to floating point
//! - Imperial-to-SI conversion constants
//! - Range-checked linear interpolation against a thrust axis

use crate::core::loaders::PropellerTable;

/// Pound-force to newton.
pub const LBF_TO_N: f64 = 4.44822;

/// Mechanical horsepower to watt.
pub const HP_TO_W: f64 = 745.7;

/// Inch-pound-force to newton-metre.
pub const INLBF_TO_NM: f64 = 0.113;

/// Fully numeric propeller table.
///
/// Produced from a [`PropellerTable`] by [`coerce_numeric`]; every cell is
/// a finite-or-infinite `f64` and every row has one cell per column.
#[derive(Debug, Clone)]
pub struct NumericTable {
    /// Column headers carried over from the raw table.
    pub columns: Vec<String>,
    /// Numeric data rows, all of length `columns.len()`.
    pub rows: Vec<Vec<f64>>,
}

impl NumericTable {
    /// Case-insensitive column lookup.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    /// Extract one column as a vector, by case-insensitive name.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx]).collect())
    }

    /// Returns the number of data rows.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }
}

/// Coerce a raw table to numeric, dropping garbage rows.
///
/// A row is dropped entirely when it has the wrong number of cells or when
/// any cell fails to parse as a number (row-wise, not column-wise). Cells
/// parsing to NaN count as failures.
pub fn coerce_numeric(table: &PropellerTable) -> NumericTable {
    let num_cols = table.columns.len();
    let mut rows = Vec::with_capacity(table.rows.len());

    for raw_row in &table.rows {
        if raw_row.len() != num_cols {
            continue;
        }
        let parsed: Option<Vec<f64>> = raw_row
            .iter()
            .map(|cell| cell.parse::<f64>().ok().filter(|v| !v.is_nan()))
            .collect();
        if let Some(row) = parsed {
            rows.push(row);
        }
    }

    NumericTable {
        columns: table.columns.clone(),
        rows,
    }
}

/// Linear interpolation of `fp` against `xp` at `x`, with range checking.
///
/// Returns `None` when the result is undefined:
/// - either array is empty, or `x` is NaN, or any input value is NaN
/// - `x` lies strictly outside `[min(xp), max(xp)]`
///
/// Otherwise the pairs are sorted ascending by `xp`, pairs with a
/// non-finite dependent value are dropped, duplicate `xp` values keep
/// their first occurrence, and `fp` is linearly interpolated at `x`.
///
/// Interpolating at one of the observed `xp` values reproduces the
/// corresponding `fp` value exactly.
pub fn safe_interp(x: f64, xp: &[f64], fp: &[f64]) -> Option<f64> {
    debug_assert_eq!(xp.len(), fp.len(), "xp and fp must have same length");

    if xp.is_empty() || fp.is_empty() || x.is_nan() {
        return None;
    }
    if xp.iter().chain(fp.iter()).any(|v| v.is_nan()) {
        return None;
    }

    let xmin = xp.iter().copied().fold(f64::INFINITY, f64::min);
    let xmax = xp.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if x < xmin || x > xmax {
        return None;
    }

    // Sort by xp (stable, so duplicate xp keep file order), drop pairs
    // with an infinite dependent value, then drop duplicate xp entries.
    let mut pairs: Vec<(f64, f64)> = xp
        .iter()
        .copied()
        .zip(fp.iter().copied())
        .filter(|&(_, f)| f.is_finite())
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    pairs.dedup_by(|b, a| b.0 == a.0);

    let (first, last) = match (pairs.first(), pairs.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return None,
    };

    // Clamp at the ends of the cleaned axis; the strict range check above
    // already ran against the full xp array.
    if x <= first.0 {
        return Some(first.1);
    }
    if x >= last.0 {
        return Some(last.1);
    }

    for window in pairs.windows(2) {
        let (x0, f0) = window[0];
        let (x1, f1) = window[1];
        if x >= x0 && x <= x1 {
            let t = (x - x0) / (x1 - x0);
            return Some(f0 + t * (f1 - f0));
        }
    }

    None
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_table(rows: &[&[&str]]) -> PropellerTable {
        PropellerTable {
            name: "80x45".to_string(),
            columns: vec!["RPM".into(), "THRUST".into(), "POWER".into()],
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_coerce_numeric_drops_bad_rows() {
        let table = raw_table(&[
            &["1000", "0.5", "0.01"],
            &["2000", "abc", "0.08"],  // non-numeric cell
            &["3000", "3.5"],          // short row
            &["4000", "4.0", "0.20"],
        ]);

        let numeric = coerce_numeric(&table);
        assert_eq!(numeric.num_rows(), 2);
        assert_eq!(numeric.rows[0], vec![1000.0, 0.5, 0.01]);
        assert_eq!(numeric.rows[1], vec![4000.0, 4.0, 0.20]);
    }

    #[test]
    fn test_coerce_numeric_drops_nan_cells() {
        let table = raw_table(&[&["1000", "NaN", "0.01"], &["2000", "2.0", "0.08"]]);
        let numeric = coerce_numeric(&table);
        assert_eq!(numeric.num_rows(), 1);
    }

    #[test]
    fn test_column_lookup_is_case_insensitive() {
        let table = raw_table(&[&["1000", "0.5", "0.01"]]);
        let numeric = coerce_numeric(&table);

        assert_eq!(numeric.column_index("rpm"), Some(0));
        assert_eq!(numeric.column_index("Thrust"), Some(1));
        assert_eq!(numeric.column("POWER"), Some(vec![0.01]));
        assert_eq!(numeric.column_index("FOM"), None);
    }

    #[test]
    fn test_safe_interp_midpoint() {
        let xp = [0.0, 10.0];
        let fp = [100.0, 200.0];
        assert_eq!(safe_interp(5.0, &xp, &fp), Some(150.0));
    }

    #[test]
    fn test_safe_interp_reproduces_knots() {
        let xp = [5.0, 20.0, 40.0];
        let fp = [1.5, 3.25, 9.75];
        for (&x, &f) in xp.iter().zip(fp.iter()) {
            assert_eq!(safe_interp(x, &xp, &fp), Some(f));
        }
    }

    #[test]
    fn test_safe_interp_outside_range_is_none() {
        let xp = [5.0, 40.0];
        let fp = [1.0, 2.0];
        assert_eq!(safe_interp(4.999, &xp, &fp), None);
        assert_eq!(safe_interp(40.001, &xp, &fp), None);
        assert_eq!(safe_interp(5.0, &xp, &fp), Some(1.0));
        assert_eq!(safe_interp(40.0, &xp, &fp), Some(2.0));
    }

    #[test]
    fn test_safe_interp_empty_or_nan_is_none() {
        assert_eq!(safe_interp(1.0, &[], &[]), None);
        assert_eq!(safe_interp(f64::NAN, &[1.0], &[2.0]), None);
        assert_eq!(safe_interp(1.0, &[1.0, f64::NAN], &[2.0, 3.0]), None);
        assert_eq!(safe_interp(1.0, &[0.0, 2.0], &[2.0, f64::NAN]), None);
    }

    #[test]
    fn test_safe_interp_unsorted_input() {
        let xp = [10.0, 0.0];
        let fp = [200.0, 100.0];
        assert_eq!(safe_interp(5.0, &xp, &fp), Some(150.0));
    }

    #[test]
    fn test_safe_interp_duplicate_xp_keeps_first() {
        let xp = [0.0, 5.0, 5.0, 10.0];
        let fp = [0.0, 50.0, 999.0, 100.0];
        assert_eq!(safe_interp(5.0, &xp, &fp), Some(50.0));
        // Between the kept knot at 5 and the one at 10.
        assert_eq!(safe_interp(7.5, &xp, &fp), Some(75.0));
    }

    #[test]
    fn test_safe_interp_drops_infinite_dependents() {
        // Efficiency arrays can contain inf from division by zero thrust
        // tables; those pairs must not take part in the interpolation.
        let xp = [0.0, 5.0, 10.0];
        let fp = [f64::INFINITY, 50.0, 100.0];
        assert_eq!(safe_interp(7.5, &xp, &fp), Some(75.0));
        // Below the surviving pairs the edge value is used.
        assert_eq!(safe_interp(2.0, &xp, &fp), Some(50.0));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 3), 1.235);
        assert_eq!(round_to(1.23444, 4), 1.2344);
        assert_eq!(round_to(-0.5, 0), -1.0);
    }

    #[test]
    fn test_unit_constants() {
        assert!((LBF_TO_N * 2.0 - 8.89644).abs() < 1e-9);
        assert!((HP_TO_W - 745.7).abs() < f64::EPSILON);
        assert!((INLBF_TO_NM - 0.113).abs() < f64::EPSILON);
    }
}
