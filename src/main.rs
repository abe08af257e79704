//! imgx - Command-line tool for batch image resizing and asset packaging

use std::process::ExitCode;

use imgx::cli;

fn main() -> ExitCode {
    cli::run()
}
