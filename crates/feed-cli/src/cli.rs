//! CLI argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "feed",
    version,
    about = "Fetch public CSV feeds and turn them into clean tables",
    long_about = "Fetch delimited-text feeds described in a catalog, repair their \
                  encoding and layout, and print or export them as tables.\n\n\
                  The built-in catalog covers the Embrapa viticulture feeds, the \
                  B3 IBOV portfolio and the running-athletes model output."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Catalog file to use instead of the built-in one (also: FEED_CATALOG).
    #[arg(long = "catalog", value_name = "PATH", global = true)]
    pub catalog: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the categories in the catalog.
    Categories,

    /// Load categories and print their records.
    Show(ShowArgs),

    /// Load categories and write date-partitioned snapshots.
    Export(ExportArgs),
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Categories to load.
    #[arg(value_name = "CATEGORY", required = true)]
    pub categories: Vec<String>,

    /// Print only this zero-based row (single category only).
    #[arg(long = "row", value_name = "N")]
    pub row: Option<usize>,

    /// Print at most this many rows per category.
    #[arg(long = "limit", value_name = "N")]
    pub limit: Option<usize>,

    #[arg(long = "format", value_enum, default_value = "json")]
    pub format: ShowFormatArg,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Categories to export.
    #[arg(value_name = "CATEGORY", required = true)]
    pub categories: Vec<String>,

    /// Root directory of the partitioned output.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Partition date (default: today, UTC).
    #[arg(long = "date", value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    #[arg(long = "format", value_enum, default_value = "parquet")]
    pub format: ExportFormatArg,

    /// Extra partition placed before the date, e.g. `index=IBOV`. Repeatable.
    #[arg(long = "partition", value_name = "KEY=VALUE", value_parser = parse_partition_arg)]
    pub partitions: Vec<(String, String)>,
}

fn parse_partition_arg(arg: &str) -> Result<(String, String), String> {
    feed_output::parse_partition(arg).map_err(|e| e.to_string())
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ShowFormatArg {
    Json,
    Table,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportFormatArg {
    Parquet,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
