//! card-edge-footprint: parametric card-edge connector footprint generator
//!
//! Reads a JSON configuration, builds the footprint and writes it as JSON
//! or as a CSV pad table.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use card_edge_footprint::config;
use card_edge_footprint::footprint::Footprint;
use card_edge_footprint::layout::{FootprintAssembler, LayoutError, LayoutResult};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Full footprint as JSON.
    Json,
    /// Pad table as CSV.
    Csv,
}

/// Parametric card-edge connector footprint generator.
///
/// Builds gold fingers, backplane through-hole rows and the bus traces
/// between them from a JSON configuration.
#[derive(Parser, Debug)]
#[command(name = "card-edge-footprint")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Write output to this file instead of stdout
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Writes the footprint in the requested format.
fn write_footprint(footprint: &Footprint, format: Format, output: Option<&Path>) -> LayoutResult<()> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path).map_err(|e| {
            LayoutError::output_error(format!("cannot create {}: {e}", path.display()))
        })?),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(sink);

    match format {
        Format::Json => {
            let json = footprint.to_json()?;
            writeln!(writer, "{json}")
                .map_err(|e| LayoutError::output_error(format!("write failed: {e}")))?;
        }
        Format::Csv => footprint.write_pad_table(&mut writer)?,
    }

    writer
        .flush()
        .map_err(|e| LayoutError::output_error(format!("flush failed: {e}")))
}

/// Builds the configured footprint and writes it out.
fn run(cfg: &config::Config, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let params = cfg.card_edge_params()?;
    let footprint = FootprintAssembler::new(params)?.build();
    write_footprint(&footprint, args.format, args.output.as_deref())?;
    Ok(())
}

/// Entry point for the card-edge-footprint generator.
fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let config_path = args.config.as_deref();
    let cfg = match config::load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            if config_path.is_none() {
                if let Some(default_path) = config::default_config_path() {
                    eprintln!("\nLoaded from: {}", default_path.display());
                    eprintln!("See config/example-config.json for the expected format");
                }
            }
            return ExitCode::FAILURE;
        }
    };

    // Initialise logging
    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting card-edge-footprint"
    );

    let result = run(&cfg, &args);

    match result {
        Ok(()) => {
            info!(format = ?args.format, "Footprint written");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Footprint generation failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
