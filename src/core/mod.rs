//! Core data types and I/O operations.

pub mod json;
pub mod loaders;
pub mod transforms;
pub mod writers;

pub use json::{load_json, write_json, JsonError};
pub use loaders::{load_propeller_file, parse_propeller_text, LoaderError, PropellerTable};
pub use transforms::{coerce_numeric, safe_interp, NumericTable};
pub use writers::{write_results_csv, write_results_report, WriteError};
