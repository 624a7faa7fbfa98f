use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use strava_export::{convert, logging};
use tracing::debug;

/// Flatten JSON files (lists of objects, `{"data": [...]}` or single objects) into one CSV.
#[derive(Parser, Debug)]
#[command(name = "json-csv")]
#[command(
    author,
    version,
    about = "Flatten a JSON file or a folder of JSON files into a single CSV"
)]
struct Args {
    /// JSON file, or folder whose *.json files are merged in name order
    input: PathBuf,

    /// Output CSV path (defaults to <input>.csv, or <folder>/merged.csv)
    output: Option<PathBuf>,

    /// Add a column with this name holding each row's source file name
    #[arg(long, value_name = "NAME")]
    source_col: Option<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose, args.quiet);
    debug!(?args, "CLI arguments parsed");

    let report = convert(
        &args.input,
        args.output.as_deref(),
        args.source_col.as_deref(),
    )
    .with_context(|| format!("Failed to convert {}", args.input.display()))?;

    println!(
        "Wrote {} rows from {} file(s) to {}",
        report.rows,
        report.files,
        report.output.display()
    );

    Ok(())
}
