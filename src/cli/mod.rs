//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chartwise")]
#[command(author, version, about = "Indicator-overlay stock dashboard with AI-assisted trade calls")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze daily history for a date range
    Analyze(AnalyzeArgs),
    /// Re-analyze 1-minute bars while the market is open
    Live(LiveArgs),
    /// Print the latest indicator values without any generation call
    Indicators(IndicatorsArgs),
    /// Explain how to read each indicator
    Guide,
    /// Validate configuration
    ValidateConfig,
}

impl Commands {
    /// Whether the command takes over the terminal with the dashboard.
    pub fn uses_dashboard(&self) -> bool {
        match self {
            Commands::Analyze(args) => args.dashboard,
            Commands::Live(args) => args.dashboard,
            _ => false,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(clap::Args)]
pub struct AnalyzeArgs {
    /// Tickers (comma-separated); defaults to the configured list
    #[arg(short = 'S', long)]
    pub tickers: Option<String>,

    /// Start date (YYYY-MM-DD); defaults to `history_days` before the end date
    #[arg(long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub end: Option<String>,

    /// Indicators to overlay (comma-separated names, e.g. "20-Day EMA,VWAP")
    #[arg(short, long, value_delimiter = ',')]
    pub indicators: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Save the JSON report to file
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Open the terminal dashboard instead of printing
    #[arg(long)]
    pub dashboard: bool,

    /// Skip the sentiment call
    #[arg(long)]
    pub no_sentiment: bool,
}

#[derive(clap::Args)]
pub struct LiveArgs {
    /// Tickers (comma-separated); defaults to the configured list
    #[arg(short = 'S', long)]
    pub tickers: Option<String>,

    /// Indicators to overlay (comma-separated names)
    #[arg(short, long, value_delimiter = ',')]
    pub indicators: Vec<String>,

    /// Stop after this many refresh cycles
    #[arg(long)]
    pub cycles: Option<u32>,

    /// Open the terminal dashboard
    #[arg(long)]
    pub dashboard: bool,

    /// Skip the sentiment call
    #[arg(long)]
    pub no_sentiment: bool,
}

#[derive(clap::Args)]
pub struct IndicatorsArgs {
    /// Tickers (comma-separated); defaults to the configured list
    #[arg(short = 'S', long)]
    pub tickers: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,

    /// Indicators to compute; defaults to all of them
    #[arg(short, long, value_delimiter = ',')]
    pub indicators: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}
