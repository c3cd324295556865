//! Loader for APC-style multi-propeller static performance files.
//!
//! An input file concatenates one block per propeller. Each block starts
//! with a filename-like marker line (e.g. `105x45.dat`, `10x58EP(F2B).dat`),
//! followed by free-form preamble and a whitespace-delimited table whose
//! header line starts with `RPM`. Blocks that are too short, unnamed, or
//! missing the table header are skipped silently.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::debug;
use regex::Regex;
use thiserror::Error;

use crate::config::LoaderConfig;

/// Propeller filename pattern, e.g. `105x45.dat` or `10x58EP(F2B).dat`.
const NAME_PATTERN: &str = r"(\d{1,3}x[0-9A-Za-z()\-]+)\.dat";

/// Errors that can occur during file loading.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Raw tabular data for one propeller.
///
/// Cells are kept as strings; numeric coercion happens in the analyzer so
/// that garbage rows can be dropped row-wise there.
#[derive(Debug, Clone)]
pub struct PropellerTable {
    /// Propeller name with the `.dat` suffix stripped, e.g. `105x45`.
    pub name: String,
    /// Column headers as they appear in the file (e.g. RPM, THRUST, POWER).
    pub columns: Vec<String>,
    /// Data rows, whitespace-split. Row lengths may be ragged.
    pub rows: Vec<Vec<String>>,
}

impl PropellerTable {
    /// Returns the number of data rows in this table.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no data rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Split multi-propeller file text into one table per propeller.
///
/// A new block starts at every line that, after stripping leading
/// whitespace, begins with the propeller filename pattern. Per block:
/// - blocks with fewer than `config.min_block_lines` lines are skipped
/// - the propeller name is the first filename-pattern match in the block
/// - the table is the first line starting with `config.header_prefix`
///   plus everything after it; the first table row holds the column headers
///
/// Duplicate propeller names keep the last block seen.
///
/// # Arguments
///
/// * `text` - Full file contents
/// * `config` - Loader configuration (uses defaults if None)
///
/// # Returns
///
/// A map from propeller name to its raw table. Rejected blocks are only
/// visible through their absence.
pub fn parse_propeller_text(
    text: &str,
    config: Option<&LoaderConfig>,
) -> HashMap<String, PropellerTable> {
    let default_config = LoaderConfig::default();
    let config = config.unwrap_or(&default_config);

    let delimiter =
        Regex::new(&format!("^{NAME_PATTERN}")).expect("delimiter pattern is valid");
    let name_re = Regex::new(NAME_PATTERN).expect("name pattern is valid");

    // Split into blocks right before each marker line. The chunk before
    // the first marker (file preamble) is kept and rejected below.
    let mut blocks: Vec<Vec<&str>> = vec![Vec::new()];
    for line in text.lines() {
        if delimiter.is_match(line.trim_start()) {
            blocks.push(Vec::new());
        }
        blocks.last_mut().expect("blocks is never empty").push(line);
    }

    let mut prop_data = HashMap::new();

    for block in &blocks {
        // Trim leading/trailing blank lines before the length check.
        let first = block.iter().position(|l| !l.trim().is_empty());
        let last = block.iter().rposition(|l| !l.trim().is_empty());
        let lines = match (first, last) {
            (Some(first), Some(last)) => &block[first..=last],
            _ => continue,
        };

        if lines.len() < config.min_block_lines {
            debug!("skipping block with {} lines", lines.len());
            continue;
        }

        let name = match name_re.captures(&lines.join("\n")) {
            Some(caps) => caps[1].to_string(),
            None => {
                debug!("skipping block without a propeller name");
                continue;
            }
        };

        // Locate the table header; everything from there on is the table.
        let header_idx = match lines
            .iter()
            .position(|l| l.trim_start().starts_with(config.header_prefix.as_str()))
        {
            Some(idx) => idx,
            None => {
                debug!("skipping block '{}' without a {} header", name, config.header_prefix);
                continue;
            }
        };

        let mut table_lines = lines[header_idx..]
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.split_whitespace().map(str::to_string).collect::<Vec<_>>());

        let columns = match table_lines.next() {
            Some(cols) => cols,
            None => continue,
        };
        let rows: Vec<Vec<String>> = table_lines.collect();

        debug!("loaded propeller '{}' with {} rows", name, rows.len());
        prop_data.insert(name.clone(), PropellerTable { name, columns, rows });
    }

    prop_data
}

/// Load a multi-propeller performance file from disk.
///
/// Reads the whole file and delegates to [`parse_propeller_text`].
///
/// # Errors
///
/// Returns an error if the file cannot be read. Malformed blocks inside
/// the file are skipped, not reported.
pub fn load_propeller_file<P: AsRef<Path>>(
    path: P,
    config: Option<&LoaderConfig>,
) -> Result<HashMap<String, PropellerTable>> {
    let text = fs::read_to_string(path.as_ref())?;
    Ok(parse_propeller_text(&text, config))
}
