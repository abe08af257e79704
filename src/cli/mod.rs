//! Command-line interface implementation
//!
//! Running `imgx` with processing flags runs a job; the only subcommand
//! writes a sample manifest.

mod process;

pub use process::{configuration_from_args, ProcessArgs};

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// imgx - batch image resizing and asset package assembly
#[derive(Parser, Debug)]
#[command(name = "imgx")]
#[command(about = "Batch-resize images and assemble sticker packs, image sets and icon bundles")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub process: ProcessArgs,

    /// Read defaults from this file instead of the discovered imgx.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a commented sample manifest
    SampleManifest {
        /// Where to write the manifest
        output: PathBuf,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::SampleManifest { output }) => process::run_sample_manifest(&output),
        None => process::run_process(&cli.process, cli.config.as_deref(), cli.verbose, cli.quiet),
    }
}
