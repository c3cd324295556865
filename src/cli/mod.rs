//! Command-line interface for the propeller pipeline.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::PathBuf;
use std::time::Instant;

use crate::core::loaders;
use crate::processors::analysis;
use crate::PipelineConfig;

#[derive(Parser)]
#[command(name = "prop-pipeline")]
#[command(about = "APC propeller static-performance selection pipeline", version)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpolate, rank and export propeller performance at two setpoints
    Analyze {
        /// Multi-propeller static performance file (APC PER2 format)
        input_file: PathBuf,
        /// Required thrust in newtons
        #[arg(short, long)]
        required: Option<f64>,
        /// Target thrust in newtons
        #[arg(short, long)]
        target: Option<f64>,
        /// Base name for the .csv/.dat outputs (no extension)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List the propellers found in a performance file
    List {
        /// Multi-propeller static performance file
        input_file: PathBuf,
    },
}

/// Create a spinner for indeterminate operations
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Print a summary box
fn print_summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║ {:<62} ║", title);
    println!("╠══════════════════════════════════════════════════════════════╣");
    for (key, value) in items {
        let display_value = if value.len() > 39 {
            format!("{}...", &value[..36])
        } else {
            value.clone()
        };
        println!("║ {:<20}: {:<39} ║", key, display_value);
    }
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}

pub fn run() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity (must come first)
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .format_timestamp_secs()
        .init();

    // Load config
    let config = match &cli.config {
        Some(path) => match PipelineConfig::from_yaml(path) {
            Ok(cfg) => {
                info!("Loaded config from: {}", path.display());
                cfg
            }
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}, using defaults",
                    path.display(),
                    e
                );
                PipelineConfig::default()
            }
        },
        None => PipelineConfig::default(),
    };

    // Dispatch to subcommands
    match cli.command {
        Commands::Analyze {
            input_file,
            required,
            target,
            output,
        } => {
            cmd_analyze(&input_file, required, target, output, &config);
        }
        Commands::List { input_file } => {
            cmd_list(&input_file, &config);
        }
    }
}

fn cmd_analyze(
    input_file: &PathBuf,
    required: Option<f64>,
    target: Option<f64>,
    output: Option<String>,
    config: &PipelineConfig,
) {
    let start = Instant::now();

    // CLI values override config
    let required_thrust_n = required.unwrap_or(config.analysis.required_thrust_n);
    let target_thrust_n = target.unwrap_or(config.analysis.target_thrust_n);
    let output_name = output.unwrap_or_else(|| config.analysis.output_name.clone());

    println!("Analyzing propeller performance...");
    println!("Input: {}", input_file.display());
    println!("Required thrust: {} N", required_thrust_n);
    println!("Target thrust: {} N", target_thrust_n);

    let spinner = create_spinner("Loading propeller tables...");

    let props = match loaders::load_propeller_file(input_file, Some(&config.loader)) {
        Ok(props) => props,
        Err(e) => {
            spinner.finish_and_clear();
            error!("Failed to load '{}': {}", input_file.display(), e);
            std::process::exit(1);
        }
    };

    spinner.set_message("Interpolating at thrust setpoints...");

    match analysis::analyze_propellers(&props, required_thrust_n, target_thrust_n, &output_name) {
        Ok(rows) => {
            spinner.finish_and_clear();

            print_summary(
                "Propeller Analysis Complete",
                &[
                    ("Input file", input_file.display().to_string()),
                    ("Propellers loaded", props.len().to_string()),
                    ("Propellers ranked", rows.len().to_string()),
                    ("Required thrust", format!("{} N", required_thrust_n)),
                    ("Target thrust", format!("{} N", target_thrust_n)),
                    (
                        "Outputs",
                        if rows.is_empty() {
                            "none (no qualifying propellers)".to_string()
                        } else {
                            format!("{output_name}.csv, {output_name}.dat")
                        },
                    ),
                    ("Duration", format!("{:.2?}", start.elapsed())),
                ],
            );
        }
        Err(e) => {
            spinner.finish_and_clear();
            error!("Analysis failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_list(input_file: &PathBuf, config: &PipelineConfig) {
    let start = Instant::now();

    let spinner = create_spinner("Loading propeller tables...");

    let props = match loaders::load_propeller_file(input_file, Some(&config.loader)) {
        Ok(props) => props,
        Err(e) => {
            spinner.finish_and_clear();
            error!("Failed to load '{}': {}", input_file.display(), e);
            std::process::exit(1);
        }
    };

    spinner.finish_and_clear();

    if props.is_empty() {
        warn!("No propellers found. Check file formatting.");
    } else {
        println!("Found {} propellers:", props.len());
        let mut names: Vec<&String> = props.keys().collect();
        names.sort();
        for name in names {
            println!("  - {} ({} rows)", name, props[name].num_rows());
        }
    }

    print_summary(
        "Propeller Listing Complete",
        &[
            ("Input file", input_file.display().to_string()),
            ("Propellers found", props.len().to_string()),
            ("Duration", format!("{:.2?}", start.elapsed())),
        ],
    );
}
