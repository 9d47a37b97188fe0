//! `csv-combine`: merge every CSV in a folder into one file.
//!
//! With no arguments it reads `data/companies/*.csv` and writes `data/combined_companies.csv`.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{ArgAction, Parser, ValueEnum};
use csv_combine::combine::{
    CombineOptions, CombineOutcome, DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_PATH, combine_directory,
};
use csv_combine::ingestion::{
    CombineObserver, CompositeObserver, Dialect, RejectedRowsFile, TracingObserver,
};
use csv_combine::logging::{LogConfig, LogFormat, init_logging};

#[derive(Parser)]
#[command(
    name = "csv-combine",
    version,
    about = "Combine per-company CSV files into one CSV with a unified header"
)]
struct Cli {
    /// Folder holding the input CSV files (created if missing).
    #[arg(long = "input-dir", value_name = "DIR", default_value = DEFAULT_INPUT_DIR)]
    input_dir: PathBuf,

    /// Path of the combined CSV.
    #[arg(long = "output", short = 'o', value_name = "FILE", default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// How lines are split into fields.
    #[arg(long = "dialect", value_enum, default_value = "literal")]
    dialect: DialectArg,

    /// Write a JSON summary of the run.
    #[arg(long = "report", value_name = "FILE")]
    report: Option<PathBuf>,

    /// Append one line per dropped row to this file.
    #[arg(long = "rejected", value_name = "FILE")]
    rejected: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    log_format: LogFormatArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum DialectArg {
    /// Split on every comma; no quoting.
    Literal,
    /// Understand double-quoted fields.
    Rfc4180,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let log_config = LogConfig::from_verbosity(cli.verbose)
        .with_format(log_format)
        .with_ansi(io::stderr().is_terminal());
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let options = CombineOptions {
        input_dir: cli.input_dir.clone(),
        output_path: cli.output.clone(),
        dialect: match cli.dialect {
            DialectArg::Literal => Dialect::Literal,
            DialectArg::Rfc4180 => Dialect::Rfc4180,
        },
        observer: Some(build_observer(cli)?),
    };

    match combine_directory(&options).context("combining CSV files")? {
        CombineOutcome::CreatedInputDir(dir) => {
            let shown = std::path::absolute(&dir).unwrap_or(dir);
            println!("Created input folder: {}", shown.display());
            println!("Please add your company CSV files and re-run.");
        }
        CombineOutcome::NoInputFiles(dir) => {
            println!("No CSV files found in folder: {}", dir.display());
        }
        CombineOutcome::Written(report) => {
            if let Some(path) = &cli.report {
                report
                    .write_json(path)
                    .with_context(|| format!("writing report to {}", path.display()))?;
            }
            println!("Combined CSV written to: {}", report.output_path.display());
        }
    }
    Ok(())
}

fn build_observer(cli: &Cli) -> anyhow::Result<Arc<dyn CombineObserver>> {
    let mut observers =
        CompositeObserver::new(vec![Arc::new(TracingObserver) as Arc<dyn CombineObserver>]);
    if let Some(path) = &cli.rejected {
        let log = RejectedRowsFile::create(path)
            .with_context(|| format!("opening rejected-rows log {}", path.display()))?;
        observers.push(Arc::new(log));
    }
    Ok(Arc::new(observers))
}
