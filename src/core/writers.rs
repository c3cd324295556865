//! Writers for analysis result exports.
//!
//! This module renders ranked propeller results to two artifacts:
//! - A machine-readable CSV with one row per propeller
//! - A human-readable fixed-width `.dat` report with a comment header
//!
//! Field labels embed the thrust setpoint, e.g. `Power@35N (W)`.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use thiserror::Error;

use crate::processors::analysis::{PerformancePoint, ResultRow};

/// Errors that can occur during write operations.
#[derive(Error, Debug)]
pub enum WriteError {
    /// Failed to create parent directories.
    #[error("failed to create parent directories for '{path}': {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or write the output file.
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV writing error.
    #[error("CSV write error for '{path}': {source}")]
    CsvError {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Result type for write operations.
pub type Result<T> = std::result::Result<T, WriteError>;

/// Creates parent directories for a file path if they don't exist.
fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| WriteError::CreateDirectory {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Column labels for the result table, setpoint values embedded.
pub fn field_labels(required_thrust_n: f64, target_thrust_n: f64) -> Vec<String> {
    let mut labels = vec!["Propeller".to_string()];
    for setpoint in [required_thrust_n, target_thrust_n] {
        labels.push(format!("RPM@{setpoint:.0}N"));
        labels.push(format!("Thrust@{setpoint:.0}N (N)"));
        labels.push(format!("Power@{setpoint:.0}N (W)"));
        labels.push(format!("Torque@{setpoint:.0}N (Nm)"));
        labels.push(format!("Cp@{setpoint:.0}N"));
        labels.push(format!("Ct@{setpoint:.0}N"));
        labels.push(format!("FOM@{setpoint:.0}N"));
        labels.push(format!("Eff@{setpoint:.0}N (N/W)"));
    }
    labels
}

/// Render one setpoint block of a row, missing values as `missing`.
///
/// `float_fmt` renders a defined float; the CSV and the report disagree on
/// both the missing marker and the float formatting.
fn point_cells(point: &PerformancePoint, missing: &str, float_fmt: impl Fn(f64) -> String) -> Vec<String> {
    let float_cell = |v: Option<f64>| v.map(&float_fmt).unwrap_or_else(|| missing.to_string());
    vec![
        point
            .rpm
            .map(|r| r.to_string())
            .unwrap_or_else(|| missing.to_string()),
        float_cell(point.thrust_n),
        float_cell(point.power_w),
        float_cell(point.torque_nm),
        float_cell(point.cp),
        float_cell(point.ct),
        float_cell(point.fom),
        float_cell(point.efficiency),
    ]
}

/// Write ranked results to CSV.
///
/// One header row of labels (setpoints embedded), one row per propeller.
/// Undefined values become empty cells.
///
/// # Errors
///
/// Returns an error if parent directories cannot be created or the file
/// cannot be written.
pub fn write_results_csv(
    path: &Path,
    rows: &[ResultRow],
    required_thrust_n: f64,
    target_thrust_n: f64,
) -> Result<()> {
    ensure_parent_dirs(path)?;

    let path_str = path.display().to_string();
    let file = File::create(path).map_err(|e| WriteError::WriteFile {
        path: path_str.clone(),
        source: e,
    })?;
    let mut csv_writer = csv::Writer::from_writer(BufWriter::new(file));

    csv_writer
        .write_record(field_labels(required_thrust_n, target_thrust_n))
        .map_err(|e| WriteError::CsvError {
            path: path_str.clone(),
            source: e,
        })?;

    for row in rows {
        let mut record = vec![row.name.clone()];
        // Rounding happened in the analyzer; plain formatting keeps it.
        record.extend(point_cells(&row.required, "", |v| v.to_string()));
        record.extend(point_cells(&row.target, "", |v| v.to_string()));
        csv_writer
            .write_record(&record)
            .map_err(|e| WriteError::CsvError {
                path: path_str.clone(),
                source: e,
            })?;
    }

    csv_writer.flush().map_err(|e| WriteError::WriteFile {
        path: path_str,
        source: e,
    })?;

    Ok(())
}

/// Write ranked results as a fixed-width text report.
///
/// The report starts with `#` comment lines describing the setpoints, the
/// units and the sort order, followed by the table right-justified per
/// column. Floats are rendered with four decimals; undefined values as
/// `NaN`.
///
/// # Errors
///
/// Returns an error if parent directories cannot be created or the file
/// cannot be written.
pub fn write_results_report(
    path: &Path,
    rows: &[ResultRow],
    required_thrust_n: f64,
    target_thrust_n: f64,
) -> Result<()> {
    ensure_parent_dirs(path)?;

    let labels = field_labels(required_thrust_n, target_thrust_n);

    let mut table: Vec<Vec<String>> = Vec::with_capacity(rows.len());
    for row in rows {
        let mut cells = vec![row.name.clone()];
        cells.extend(point_cells(&row.required, "NaN", |v| format!("{v:.4}")));
        cells.extend(point_cells(&row.target, "NaN", |v| format!("{v:.4}")));
        table.push(cells);
    }

    // Per-column width: widest of label and cells.
    let widths: Vec<usize> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            table
                .iter()
                .map(|cells| cells[i].len())
                .chain(std::iter::once(label.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let justify = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, &w)| format!("{cell:>w$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };

    let mut content = String::new();
    content.push_str(&format!(
        "# Interpolated propeller performance at {required_thrust_n:.0} N (required) \
         and {target_thrust_n:.0} N (target)\n"
    ));
    content.push_str("# SI units: Thrust=N, Power=W, Torque=Nm; Cp, Ct, FOM dimensionless\n");
    content.push_str("# Sorted by Power at required thrust (ascending)\n");
    content.push_str(
        "# ---------------------------------------------------------------------------\n\n",
    );
    content.push_str(&justify(&labels));
    content.push('\n');
    for cells in &table {
        content.push_str(&justify(cells));
        content.push('\n');
    }

    fs::write(path, content).map_err(|e| WriteError::WriteFile {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_point() -> PerformancePoint {
        PerformancePoint {
            rpm: Some(4500),
            thrust_n: Some(35.0),
            power_w: Some(512.345),
            torque_nm: Some(1.2345),
            cp: Some(0.05123),
            ct: Some(0.10234),
            fom: Some(0.61234),
            efficiency: Some(0.068312),
        }
    }

    fn sample_row() -> ResultRow {
        ResultRow {
            name: "80x45".to_string(),
            required: sample_point(),
            target: PerformancePoint::default(),
        }
    }

    #[test]
    fn test_field_labels_embed_setpoints() {
        let labels = field_labels(35.0, 14.0);
        assert_eq!(labels.len(), 17);
        assert_eq!(labels[0], "Propeller");
        assert_eq!(labels[1], "RPM@35N");
        assert_eq!(labels[3], "Power@35N (W)");
        assert_eq!(labels[8], "Eff@35N (N/W)");
        assert_eq!(labels[9], "RPM@14N");
        assert_eq!(labels[16], "Eff@14N (N/W)");
    }

    #[test]
    fn test_write_results_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");

        write_results_csv(&path, &[sample_row()], 35.0, 14.0).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        assert!(lines[0].starts_with("Propeller,RPM@35N,"));

        let cells: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(cells[0], "80x45");
        assert_eq!(cells[1], "4500");
        assert_eq!(cells[3], "512.345");
        // Entire undefined target block renders as empty cells.
        assert!(cells[9..17].iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_write_results_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.dat");

        write_results_report(&path, &[sample_row()], 35.0, 14.0).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert!(lines[0].starts_with("# Interpolated propeller performance at 35 N"));
        assert!(lines[1].starts_with("# SI units"));
        assert!(lines[2].starts_with("# Sorted by Power"));
        assert!(lines[3].starts_with("# ---"));
        assert!(lines[4].is_empty());

        // Header then one data row, right-justified fixed-width floats.
        assert!(lines[5].contains("Power@35N (W)"));
        assert!(lines[6].contains("512.3450"));
        assert!(lines[6].contains("NaN"));
    }

    #[test]
    fn test_writers_create_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out").join("results.csv");

        write_results_csv(&path, &[sample_row()], 35.0, 14.0).unwrap();

        assert!(path.exists());
    }
}
