//! CLI tool to select, rename and row-filter the columns of a CSV file.
//!
//! Usage:
//!   csvtool 2 0 --input data.csv
//!   csvtool --named Title B --new Name Value --filter '0-9' -o out.csv
//!
//! Reads stdin and writes stdout unless told otherwise.

use clap::{Parser, ValueEnum};
use csvtool::{
    ColumnSpec, CsvToolError, Dialect, OutputQuoting, RowFilter, TransformConfig, io::STDIO,
    run_files,
};
use std::process;
use tracing_subscriber::EnvFilter;

/// Extract columns from a CSV stream, by index or by header name.
#[derive(Parser)]
#[command(name = "csvtool", version)]
struct Cli {
    /// Columns to extract: 0-based indices, or header names with --named
    #[arg(required = true)]
    columns: Vec<String>,

    /// Input file, `-` for stdin
    #[arg(short, long, default_value = STDIO)]
    input: String,

    /// Output file, `-` for stdout
    #[arg(short, long, default_value = STDIO)]
    output: String,

    /// Treat COLUMNS as header names; the first row is the header
    #[arg(long)]
    named: bool,

    /// New names for the selected columns, one per column
    #[arg(long, num_args = 1..)]
    new: Option<Vec<String>>,

    /// Data rows to keep, e.g. "0,2-4,8-" (0-based, header excluded)
    #[arg(long)]
    filter: Option<String>,

    /// Drop the rows matched by --filter instead of keeping them
    #[arg(long)]
    invert_filter: bool,

    /// Do not write the header row
    #[arg(long)]
    no_print_header: bool,

    /// Field delimiter for input and output
    #[arg(short, long, default_value_t = ',')]
    delimiter: char,

    /// When to quote output fields
    #[arg(long, value_enum, default_value_t = QuoteArg::Necessary)]
    quote_style: QuoteArg,

    /// Logging level (RUST_LOG overrides)
    #[arg(short = 'L', long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

#[derive(Clone, Copy, ValueEnum)]
enum QuoteArg {
    Necessary,
    Always,
    NonNumeric,
    Never,
}

impl From<QuoteArg> for OutputQuoting {
    fn from(q: QuoteArg) -> Self {
        match q {
            QuoteArg::Necessary => OutputQuoting::Necessary,
            QuoteArg::Always => OutputQuoting::Always,
            QuoteArg::NonNumeric => OutputQuoting::NonNumeric,
            QuoteArg::Never => OutputQuoting::Never,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

fn init_logging(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn configure(cli: &Cli) -> Result<(Dialect, TransformConfig), CsvToolError> {
    let dialect = Dialect::with_delimiter(cli.delimiter, cli.quote_style.into())?;
    let columns = ColumnSpec::parse(&cli.columns, cli.named)?;
    let filter = RowFilter::from_expr(cli.filter.as_deref(), cli.invert_filter)?;

    let mut config = TransformConfig::new(columns)
        .with_filter(filter)
        .with_print_header(!cli.no_print_header);
    if let Some(new) = &cli.new {
        config = config.with_rename(new.clone());
    }
    Ok((dialect, config))
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let result = configure(&cli)
        .and_then(|(dialect, config)| run_files(&cli.input, &cli.output, &dialect, config));

    match result {
        Ok(summary) => {
            tracing::debug!(?summary, "finished");
        }
        // Downstream closed the pipe (`csvtool ... | head`): not a failure.
        Err(e) if e.is_broken_pipe() => process::exit(0),
        Err(e) => {
            tracing::debug!(class = ?e.class(), "run failed");
            eprintln!("csvtool: {e}");
            process::exit(1);
        }
    }
}
