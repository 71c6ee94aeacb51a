use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Match log lines against CloudWatch Logs filter patterns
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML config file with defaults and saved filters
    #[arg(long, global = true, env = "CWLOG_FILTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format (falls back to the config file, then text)
    #[arg(short = 'F', long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// When to color output (falls back to the config file, then auto)
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorMode>,

    /// Increase diagnostic output on stderr (--verbose, --verbose --verbose)
    #[arg(long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the lines of FILES (or stdin) that match a filter pattern
    Grep {
        #[command(flatten)]
        pattern: PatternArgs,

        /// Files to read; stdin when none are given or for '-'
        files: Vec<PathBuf>,

        /// Select lines that do not match
        #[arg(short = 'v', long)]
        invert_match: bool,

        /// Print only the number of selected lines per source
        #[arg(short, long)]
        count: bool,

        /// Prefix each line with its line number
        #[arg(short = 'n', long)]
        line_number: bool,

        /// Stop reading a source after NUM selected lines
        #[arg(short, long, value_name = "NUM")]
        max_count: Option<usize>,
    },
    /// Show how a filter pattern is split into terms
    Explain {
        #[command(flatten)]
        pattern: PatternArgs,
    },
    /// Check a single log line against a filter pattern
    Check {
        /// Filter pattern, e.g. 'ERROR -"health check"'
        #[arg(allow_hyphen_values = true)]
        pattern: String,

        /// The log line to test
        #[arg(allow_hyphen_values = true)]
        line: String,
    },
}

/// Where the filter pattern comes from: given inline or saved in the config
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct PatternArgs {
    /// Filter pattern, e.g. 'ERROR -"health check"'
    #[arg(short = 'e', long = "pattern", allow_hyphen_values = true)]
    pub pattern: Option<String>,

    /// Name of a filter from the [filters] table of the config file
    #[arg(short, long)]
    pub saved: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
