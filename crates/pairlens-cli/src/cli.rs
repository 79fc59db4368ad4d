//! CLI argument definitions for pairlens.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `analyze` | Compare two instruments' returns and correlation |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! # Default pair and window
//! pairlens analyze
//!
//! # Scatter of daily returns written to a PNG
//! pairlens analyze MSFT PEP --chart return-relationship --chart-out scatter.png
//!
//! # Machine-readable output, offline data
//! pairlens --format json --pretty analyze AAPL KO --mock
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pairlens_core::ChartChoice;

/// Two-instrument return and correlation analysis.
#[derive(Debug, Parser)]
#[command(
    name = "pairlens",
    author,
    version,
    about = "Two-instrument return and correlation analysis",
    long_about = "pairlens fetches adjusted daily closes for two instruments, computes \
day-over-day returns on their shared trading dates, and reports descriptive statistics, \
the Pearson correlation and a chart of your choice.\n\
\n\
Use 'pairlens <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    ///
    /// - table: human-readable report (default)
    /// - json: single JSON envelope
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report for terminal display.
    Table,
    /// Single JSON envelope.
    Json,
}

/// Chart to produce for the analysed pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartArg {
    /// Both price series over time.
    PriceEvolution,
    /// Scatter of paired daily returns.
    ReturnRelationship,
    /// 2x2 correlation heat matrix.
    CorrelationMatrix,
}

impl From<ChartArg> for ChartChoice {
    fn from(value: ChartArg) -> Self {
        match value {
            ChartArg::PriceEvolution => Self::PriceEvolution,
            ChartArg::ReturnRelationship => Self::ReturnRelationship,
            ChartArg::CorrelationMatrix => Self::CorrelationMatrix,
        }
    }
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyse the return relationship of two instruments.
    ///
    /// Fetches adjusted closes for both symbols over [start, end), joins
    /// them on shared dates and reports statistics and correlation.
    ///
    /// # Examples
    ///
    ///   pairlens analyze
    ///   pairlens analyze AAPL KO --start 2023-01-01 --end 2024-01-01
    ///   pairlens analyze ^GSPC GLD --chart correlation-matrix --chart-out corr.png
    Analyze(AnalyzeArgs),
}

/// Arguments for the `analyze` command.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// First ticker symbol.
    #[arg(default_value = "AAPL")]
    pub first: String,

    /// Second ticker symbol.
    #[arg(default_value = "KO")]
    pub second: String,

    /// First date of the window (YYYY-MM-DD, inclusive).
    #[arg(long, default_value = "2022-01-01")]
    pub start: String,

    /// End of the window (YYYY-MM-DD, exclusive).
    #[arg(long, default_value = "2025-01-01")]
    pub end: String,

    /// Chart to produce.
    #[arg(long, value_enum, default_value_t = ChartArg::PriceEvolution)]
    pub chart: ChartArg,

    /// Write the selected chart to this PNG file.
    #[arg(long)]
    pub chart_out: Option<PathBuf>,

    /// Number of trailing joined price rows to show.
    #[arg(long, default_value_t = 5)]
    pub tail: usize,

    /// Use deterministic offline prices instead of Yahoo Finance.
    #[arg(long, default_value_t = false)]
    pub mock: bool,

    /// Retry transient fetch failures this many times.
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Per-request timeout in milliseconds (overrides PAIRLENS_TIMEOUT_MS).
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}
