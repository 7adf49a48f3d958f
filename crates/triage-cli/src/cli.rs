//! CLI argument definitions for patient triage.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "patient-triage",
    version,
    about = "Patient risk triage - fetch, classify and score patient vitals",
    long_about = "Fetch patient records from the assessment API, classify blood pressure,\n\
                  temperature and age, and select the scoring variant whose high-risk count\n\
                  matches the expected count.\n\n\
                  The API key is read from the TRIAGE_API_KEY environment variable\n\
                  (a .env file in the working directory is honoured)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include patient identifiers in debug and trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch all patients, score them and report the result sets.
    Assess(AssessArgs),

    /// List the scoring variants that are tried during calibration.
    Variants,
}

#[derive(Parser)]
pub struct AssessArgs {
    /// API base URL (overrides TRIAGE_API_URL).
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: Option<String>,

    /// Patients requested per page.
    #[arg(
        long = "page-limit",
        default_value_t = 20,
        value_parser = clap::value_parser!(u32).range(1..=20)
    )]
    pub page_limit: u32,

    /// High-risk count the selected scoring variant should reproduce.
    #[arg(long = "expected-high-risk", value_name = "COUNT", default_value_t = 20)]
    pub expected_high_risk: usize,

    /// Per-request timeout in seconds.
    #[arg(long = "request-timeout-secs", value_name = "SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Submit the result sets to the assessment endpoint.
    #[arg(long = "submit")]
    pub submit: bool,

    /// Write the submission payload as JSON to this file.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
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
