//! Dataset quality command-line tool.
//!
//! Loads CSV files or aggregate counts, runs the quality engine and prints
//! JSON results on stdout. Logs go to stderr.

use clap::Parser;
use dsquality_cli::{Cli, execute};
use dsquality_core::init_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet, cli.global.log_json)?;

    let output = execute(&cli)?;
    println!("{output}");
    Ok(())
}
