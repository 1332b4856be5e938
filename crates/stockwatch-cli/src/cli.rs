//! CLI argument definitions for stockwatch.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `percent-change` | Daily price change (%) for one or more tickers |
//! | `volume-change` | Daily volume with increase/decrease labels |
//! | `profit-chart` | Line chart of a stock's change against a benchmark |
//! | `volume-chart` | Bar chart of day-over-day volume change |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--offline` | `false` | Use the deterministic fixture source |
//! | `--timeout-ms` | env or `10000` | Provider request timeout |
//! | `--base-url` | env or Yahoo | Provider base URL |
//! | `--verbose` | `false` | Debug logging on stderr unless `RUST_LOG` is set |
//!
//! # Examples
//!
//! ```bash
//! stockwatch percent-change AAPL MSFT --start 2017-01-01 --end 2017-01-10 --format table
//! stockwatch volume-change AAPL --start 2021-01-01 --end 2022-01-01
//! stockwatch profit-chart AAPL --benchmark SPY --start 2015-01-01 --end 2021-12-31 --output profit.html
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use stockwatch_core::Baseline;

/// Stock profitability and trading-volume statistics.
#[derive(Debug, Parser)]
#[command(
    name = "stockwatch",
    author,
    version,
    about = "Stock profitability and trading-volume statistics with charts"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Serve deterministic fixture data instead of calling Yahoo Finance.
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,

    /// Provider request timeout in milliseconds (overrides STOCKWATCH_TIMEOUT_MS).
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    /// Provider base URL (overrides STOCKWATCH_BASE_URL).
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Log at debug level when RUST_LOG is not set.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON envelope.
    Json,
    /// Aligned text table.
    Table,
}

/// Reference close for percent change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BaselineArg {
    /// First close in the range; first row is 0.
    PeriodStart,
    /// Previous day's close; first day is omitted.
    PreviousClose,
}

impl From<BaselineArg> for Baseline {
    fn from(value: BaselineArg) -> Self {
        match value {
            BaselineArg::PeriodStart => Baseline::PeriodStart,
            BaselineArg::PreviousClose => Baseline::PreviousClose,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Daily percentage change of the close within a date range.
    ///
    ///   stockwatch percent-change AAPL --start 2017-01-01 --end 2017-01-10
    ///   stockwatch percent-change AAPL MSFT --start 2017-01-01 --end 2017-01-10 --format table
    PercentChange(PercentChangeArgs),

    /// Daily trading volume and whether it rose or fell.
    ///
    ///   stockwatch volume-change AAPL --start 2021-01-01 --end 2022-01-01
    VolumeChange(VolumeChangeArgs),

    /// Line chart of a stock's percent change against a benchmark.
    ///
    ///   stockwatch profit-chart AAPL --benchmark SPY --start 2015-01-01 --end 2021-12-31
    ProfitChart(ProfitChartArgs),

    /// Bar chart of daily traded volume, colored by direction against the prior day.
    ///
    ///   stockwatch volume-chart AAPL --start 2021-01-01 --end 2022-01-01 --output volume.html
    VolumeChart(VolumeChartArgs),
}

/// Date range shared by every command. `--end` is exclusive.
#[derive(Debug, Args)]
pub struct RangeArgs {
    /// First day to include (YYYY-MM-DD).
    #[arg(long)]
    pub start: String,

    /// Day after the last one to include (YYYY-MM-DD).
    #[arg(long)]
    pub end: String,
}

#[derive(Debug, Args)]
pub struct PercentChangeArgs {
    /// One or more tickers (e.g. AAPL MSFT SPY).
    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,

    #[command(flatten)]
    pub range: RangeArgs,

    #[arg(long, value_enum, default_value_t = BaselineArg::PeriodStart)]
    pub baseline: BaselineArg,
}

#[derive(Debug, Args)]
pub struct VolumeChangeArgs {
    pub symbol: String,

    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Debug, Args)]
pub struct ProfitChartArgs {
    pub symbol: String,

    /// Benchmark ticker to compare against (e.g. SPY, ^GSPC).
    #[arg(long)]
    pub benchmark: String,

    #[command(flatten)]
    pub range: RangeArgs,

    /// Write the chart to this file: HTML if it ends in .html, Vega-Lite JSON otherwise.
    #[arg(long)]
    pub output: Option<String>,
}

#[derive(Debug, Args)]
pub struct VolumeChartArgs {
    pub symbol: String,

    #[command(flatten)]
    pub range: RangeArgs,

    /// Write the chart to this file: HTML if it ends in .html, Vega-Lite JSON otherwise.
    #[arg(long)]
    pub output: Option<String>,

    /// Plot day-over-day volume deltas instead of traded volume.
    #[arg(long)]
    pub delta: bool,
}
