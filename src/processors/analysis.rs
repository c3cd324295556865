//! Thrust-setpoint analysis and propeller ranking.
//!
//! For every loaded propeller this module converts the imperial performance
//! columns to SI, checks that the propeller can reach the required thrust,
//! interpolates RPM, power, torque, Cp, Ct, FOM and efficiency at the
//! required and target thrust setpoints, and ranks the survivors ascending
//! by power at the required setpoint. `analyze_propellers` additionally
//! exports the ranked table as CSV and fixed-width report.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::PathBuf;

use log::{debug, info, warn};
use thiserror::Error;

use crate::core::loaders::PropellerTable;
use crate::core::transforms::{
    coerce_numeric, round_to, safe_interp, HP_TO_W, INLBF_TO_NM, LBF_TO_N,
};
use crate::core::writers::{self, WriteError};

/// Errors that can occur during analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("export error: {0}")]
    Write(#[from] WriteError),
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Interpolated performance of one propeller at one thrust setpoint.
///
/// A `None` field means the value is undefined at this setpoint, e.g.
/// because the setpoint lies outside the propeller's observed thrust
/// range. Values carry the rounding used in the exports: RPM to the
/// nearest integer, power to 3, torque to 4, Cp/Ct/FOM to 5 and
/// efficiency to 6 decimal places.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformancePoint {
    pub rpm: Option<i64>,
    pub thrust_n: Option<f64>,
    pub power_w: Option<f64>,
    pub torque_nm: Option<f64>,
    pub cp: Option<f64>,
    pub ct: Option<f64>,
    pub fom: Option<f64>,
    pub efficiency: Option<f64>,
}

/// One propeller's performance at both setpoints.
#[derive(Debug, Clone)]
pub struct ResultRow {
    pub name: String,
    pub required: PerformancePoint,
    pub target: PerformancePoint,
}

/// SI-converted columns of one propeller table.
struct SiColumns {
    rpm: Vec<f64>,
    thrust_n: Vec<f64>,
    power_w: Vec<f64>,
    torque_nm: Vec<f64>,
    cp: Vec<f64>,
    ct: Vec<f64>,
    fom: Vec<f64>,
}

impl SiColumns {
    /// Coerce and convert a raw table; `None` if a required column is
    /// missing (column names are matched case-insensitively).
    fn from_table(table: &PropellerTable) -> Option<Self> {
        let numeric = coerce_numeric(table);

        let scaled = |name: &str, factor: f64| -> Option<Vec<f64>> {
            Some(numeric.column(name)?.iter().map(|v| v * factor).collect())
        };

        Some(Self {
            rpm: numeric.column("RPM")?,
            thrust_n: scaled("THRUST", LBF_TO_N)?,
            power_w: scaled("POWER", HP_TO_W)?,
            torque_nm: scaled("TORQUE", INLBF_TO_NM)?,
            cp: numeric.column("Cp")?,
            ct: numeric.column("Ct")?,
            fom: numeric.column("FOM")?,
        })
    }

    /// Thrust-per-power in N/W. Zero power rows yield non-finite values
    /// which the interpolation cleaning step discards.
    fn efficiency(&self) -> Vec<f64> {
        self.thrust_n
            .iter()
            .zip(self.power_w.iter())
            .map(|(t, p)| t / p)
            .collect()
    }

    /// Interpolate every metric at thrust setpoint `x`, rounded for export.
    fn point_at(&self, x: f64, efficiency: &[f64]) -> PerformancePoint {
        let at = |fp: &[f64]| safe_interp(x, &self.thrust_n, fp);

        PerformancePoint {
            rpm: at(&self.rpm).map(|v| v.round() as i64),
            thrust_n: None,
            power_w: at(&self.power_w).map(|v| round_to(v, 3)),
            torque_nm: at(&self.torque_nm).map(|v| round_to(v, 4)),
            cp: at(&self.cp).map(|v| round_to(v, 5)),
            ct: at(&self.ct).map(|v| round_to(v, 5)),
            fom: at(&self.fom).map(|v| round_to(v, 5)),
            efficiency: at(efficiency).map(|v| round_to(v, 6)),
        }
    }
}

/// Rank propellers by power demand at the required thrust.
///
/// Propellers whose maximum observed thrust is below `required_thrust_n`,
/// or whose minimum observed thrust exceeds `target_thrust_n`, are
/// excluded entirely. The survivors are sorted ascending by power at the
/// required setpoint, undefined values last.
pub fn rank_propellers(
    prop_data: &HashMap<String, PropellerTable>,
    required_thrust_n: f64,
    target_thrust_n: f64,
) -> Vec<ResultRow> {
    let mut rows = Vec::new();

    for (name, table) in prop_data {
        let si = match SiColumns::from_table(table) {
            Some(si) => si,
            None => {
                debug!("skipping '{}': missing performance column", name);
                continue;
            }
        };

        let max_thrust = si.thrust_n.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min_thrust = si.thrust_n.iter().copied().fold(f64::INFINITY, f64::min);
        if max_thrust < required_thrust_n || min_thrust > target_thrust_n {
            debug!(
                "skipping '{}': thrust range [{:.2}, {:.2}] N misses setpoints",
                name, min_thrust, max_thrust
            );
            continue;
        }

        let efficiency = si.efficiency();

        let mut required = si.point_at(required_thrust_n, &efficiency);
        // The required setpoint is reported verbatim, not interpolated.
        required.thrust_n = Some(round_to(required_thrust_n, 3));

        let mut target = si.point_at(target_thrust_n, &efficiency);
        target.thrust_n = (min_thrust <= target_thrust_n && target_thrust_n <= max_thrust)
            .then(|| round_to(target_thrust_n, 3));

        rows.push(ResultRow {
            name: name.clone(),
            required,
            target,
        });
    }

    rows.sort_by(|a, b| match (a.required.power_w, b.required.power_w) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    rows
}

/// Rank propellers and export the result table.
///
/// Writes `<output_name>.csv` and `<output_name>.dat` next to each other
/// and returns the ranked rows. When no propeller passes the reachability
/// filter a warning is logged, nothing is written, and the returned table
/// is empty.
///
/// # Arguments
///
/// * `prop_data` - Loaded propeller tables keyed by name
/// * `required_thrust_n` - Thrust every candidate must reach, in newtons
/// * `target_thrust_n` - Secondary setpoint, in newtons
/// * `output_name` - Base path for the artifacts, without extension
///
/// # Errors
///
/// Returns an error if either artifact cannot be written.
pub fn analyze_propellers(
    prop_data: &HashMap<String, PropellerTable>,
    required_thrust_n: f64,
    target_thrust_n: f64,
    output_name: &str,
) -> Result<Vec<ResultRow>> {
    let rows = rank_propellers(prop_data, required_thrust_n, target_thrust_n);

    if rows.is_empty() {
        warn!("no propellers can reach the required thrust of {required_thrust_n:.1} N");
        return Ok(rows);
    }

    let csv_path = PathBuf::from(format!("{output_name}.csv"));
    let dat_path = PathBuf::from(format!("{output_name}.dat"));

    writers::write_results_csv(&csv_path, &rows, required_thrust_n, target_thrust_n)?;
    writers::write_results_report(&dat_path, &rows, required_thrust_n, target_thrust_n)?;

    info!(
        "{} propellers can reach {:.1} N; results exported to '{}' and '{}'",
        rows.len(),
        required_thrust_n,
        csv_path.display(),
        dat_path.display()
    );

    Ok(rows)
}
