//! Processing command implementation

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser};

use super::{Cli, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::build::{BlockOutcome, Pipeline};
use crate::config::loader::{load_config, merge_cli_overrides, CliOverrides};
use crate::config::{ConfigError, Configuration, LogLevel};
use crate::logging;
use crate::manifest::write_sample_manifest;
use crate::models::{ImageFormat, PackageKind, Preset};

/// Flags describing a job.
#[derive(Args, Debug, Default, Clone)]
pub struct ProcessArgs {
    /// Source directory, or a single source image
    #[arg(long, value_name = "PATH")]
    pub src: Option<PathBuf>,

    /// Destination directory, package container or .icns file
    #[arg(long, value_name = "PATH")]
    pub dst: Option<PathBuf>,

    /// Manifest selecting blocks of files and settings
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Named set of transform plans
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Source format to accept (repeatable; default: all)
    #[arg(long = "valid-format", value_enum, value_name = "FORMAT")]
    pub valid_format: Vec<ImageFormat>,

    /// Output format (default: keep the source format)
    #[arg(long, value_enum)]
    pub out_format: Option<ImageFormat>,

    /// Write processed image names here as a JSON array (catalog package)
    #[arg(long, value_name = "PATH")]
    pub out_manifest: Option<PathBuf>,

    /// Package layout to assemble outputs into
    #[arg(long, value_enum)]
    pub out_package: Option<PackageKind>,

    /// Clear the destination package before adding images
    #[arg(long)]
    pub out_package_replace: bool,

    /// Uniform scale factor
    #[arg(long)]
    pub scale: Option<f64>,

    /// Bounding box size for both width and height
    #[arg(long, value_name = "PX")]
    pub max_px: Option<u32>,

    /// Bounding box width
    #[arg(long, value_name = "PX")]
    pub max_width_px: Option<u32>,

    /// Bounding box height
    #[arg(long, value_name = "PX")]
    pub max_height_px: Option<u32>,
}

impl ProcessArgs {
    /// The values given on the command line.
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            src: self.src.clone(),
            dst: self.dst.clone(),
            manifest: self.manifest.clone(),
            preset: self.preset,
            valid_formats: self.valid_format.clone(),
            out_format: self.out_format,
            out_manifest: self.out_manifest.clone(),
            out_package: self.out_package,
            out_package_replace: self.out_package_replace,
            scale: self.scale,
            max_px: self.max_px,
            max_width_px: self.max_width_px,
            max_height_px: self.max_height_px,
        }
    }
}

/// Build a configuration from argument strings (program name first).
///
/// No config file is consulted.
pub fn configuration_from_args<I, T>(args: I) -> Result<Configuration, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args).map_err(|e| ConfigError::Arguments(e.to_string()))?;
    merge_cli_overrides(&Configuration::default(), &cli.process.overrides())
}

fn print_outcome(outcome: &BlockOutcome) {
    let label = if outcome.index > 0 { format!("Block {}: ", outcome.index) } else { String::new() };
    match &outcome.result {
        Ok(report) => {
            for line in report.error_lines() {
                eprintln!("{}{}", label, line);
            }
            println!("{}{}", label, report.summary());
        }
        Err(e) => eprintln!("{}Error: {}", label, e),
    }
}

/// Run the processing command
pub fn run_process(
    args: &ProcessArgs,
    config_path: Option<&Path>,
    verbose: bool,
    quiet: bool,
) -> ExitCode {
    let file_config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let level = if quiet {
        LogLevel::Warn
    } else if verbose {
        LogLevel::Debug
    } else {
        file_config.logging.level
    };
    logging::init(level);

    let base = file_config.defaults.to_configuration();
    let config = match merge_cli_overrides(&base, &args.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let outcomes = Pipeline::new(config).run();
    for outcome in &outcomes {
        print_outcome(outcome);
    }

    if outcomes.iter().all(BlockOutcome::is_success) {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}

/// Run the sample-manifest command
pub fn run_sample_manifest(output: &Path) -> ExitCode {
    match write_sample_manifest(output) {
        Ok(()) => {
            println!("Wrote {}", output.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
