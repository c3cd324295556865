//! JSON load/save helpers.
//!
//! Small utility for reading and writing arbitrary JSON documents, e.g.
//! aircraft parameter files edited between pipeline runs. No schema is
//! enforced; documents round-trip modulo key ordering and indentation.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};
use thiserror::Error;

/// Default indentation width for [`write_json`].
pub const DEFAULT_INDENT: usize = 2;

/// Errors that can occur during JSON IO.
#[derive(Error, Debug)]
pub enum JsonError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for JSON operations.
pub type Result<T> = std::result::Result<T, JsonError>;

/// Load an arbitrary JSON document from a file.
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Value> {
    let file = File::open(path.as_ref())?;
    let value = serde_json::from_reader(BufReader::new(file))?;
    Ok(value)
}

/// Write a JSON document to a file, pretty-printed.
///
/// `indent` is the number of spaces per indentation level.
pub fn write_json<P: AsRef<Path>>(path: P, value: &Value, indent: usize) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);

    let indent_bytes = vec![b' '; indent];
    let formatter = PrettyFormatter::with_indent(&indent_bytes);
    let mut serializer = Serializer::with_formatter(&mut writer, formatter);
    value.serialize(&mut serializer)?;

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_json_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aircraft_data.json");

        let value = json!({
            "blade": { "C_LIFT": 0.1, "chord_m": [0.02, 0.018, 0.015] },
            "name": "test-rig",
            "setpoints": [35, 14],
            "valid": true,
            "note": null
        });

        write_json(&path, &value, DEFAULT_INDENT).unwrap();
        let loaded = load_json(&path).unwrap();

        assert_eq!(loaded, value);
    }

    #[test]
    fn test_write_json_custom_indent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wide.json");

        write_json(&path, &json!({"a": 1}), 4).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n    \"a\": 1"));
    }

    #[test]
    fn test_load_json_invalid_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(load_json(&path), Err(JsonError::Json(_))));
    }
}
