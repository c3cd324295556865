//! Propeller static-performance selection pipeline.
//!
//! This crate provides tools for:
//! - Loading and splitting APC-style multi-propeller `.dat` performance files
//! - Converting imperial performance columns to SI units
//! - Interpolating RPM, power, torque and coefficients at thrust setpoints
//! - Ranking propellers by power demand and exporting CSV/text reports
//!
//! # Example
//!
//! ```no_run
//! use prop_pipeline::core::loaders::load_propeller_file;
//! use prop_pipeline::processors::analysis::analyze_propellers;
//!
//! let props = load_propeller_file("PER2_STATIC-2.dat", None).unwrap();
//! let rows = analyze_propellers(&props, 35.0, 14.0, "propeller_select").unwrap();
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod processors;

pub use config::{AnalysisConfig, LoaderConfig, PipelineConfig};
pub use core::loaders::PropellerTable;
pub use processors::analysis::{PerformancePoint, ResultRow};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
