//! Configuration types for the propeller pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the thrust-setpoint analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Thrust every candidate propeller must reach, in newtons
    #[serde(default = "default_required_thrust_n")]
    pub required_thrust_n: f64,

    /// Secondary (cruise) thrust setpoint, in newtons
    #[serde(default = "default_target_thrust_n")]
    pub target_thrust_n: f64,

    /// Base name for the exported .csv/.dat artifacts (no extension)
    #[serde(default = "default_output_name")]
    pub output_name: String,
}

fn default_required_thrust_n() -> f64 {
    35.0
}

fn default_target_thrust_n() -> f64 {
    14.0
}

fn default_output_name() -> String {
    "prop_selection_SI".to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            required_thrust_n: default_required_thrust_n(),
            target_thrust_n: default_target_thrust_n(),
            output_name: default_output_name(),
        }
    }
}

/// Configuration for the performance-file loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Minimum number of lines a block needs to be considered a table
    #[serde(default = "default_min_block_lines")]
    pub min_block_lines: usize,

    /// Prefix of the column-header line inside each block
    #[serde(default = "default_header_prefix")]
    pub header_prefix: String,
}

fn default_min_block_lines() -> usize {
    5
}

fn default_header_prefix() -> String {
    "RPM".to_string()
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            min_block_lines: default_min_block_lines(),
            header_prefix: default_header_prefix(),
        }
    }
}

/// Main pipeline configuration combining all sub-configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub loader: LoaderConfig,
}

impl PipelineConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
