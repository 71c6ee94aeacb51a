pub mod cli;
pub mod config;
pub mod filter;
pub mod output;
pub mod scan;

use crate::config::{ConfigError, FilterConfig};
use crate::output::DisplayOptions;
use crate::scan::{ScanOptions, ScanReport, scan_path, scan_stdin};
use anyhow::Context;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

pub use cli::{Cli, ColorMode, Commands, OutputFormat, PatternArgs, cli_parse};
pub use filter::{FilterPattern, Term, TermKind, is_cloudwatch_log_filter_match, tokenize};

/// Exit status when no line was selected, as with grep
const EXIT_NO_MATCH: u8 = 1;

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        tracing::Level::ERROR
    } else {
        match verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Force colors on or off and report whether they are enabled
fn apply_color_mode(mode: ColorMode) -> bool {
    let enabled = match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
        }
    };
    colored::control::set_override(enabled);
    enabled
}

/// Pick the inline pattern, or look up a saved one in the config
pub fn resolve_pattern(args: &PatternArgs, config: &FilterConfig) -> Result<String, ConfigError> {
    match (&args.pattern, &args.saved) {
        (Some(pattern), _) => Ok(pattern.clone()),
        (None, Some(name)) => config.saved_filter(name).map(str::to_string),
        (None, None) => Ok(String::new()),
    }
}

fn compile_pattern(args: &PatternArgs, config: &FilterConfig) -> anyhow::Result<FilterPattern> {
    let expr = resolve_pattern(args, config)?;
    let pattern = FilterPattern::new(&expr);
    tracing::debug!(
        pattern = %pattern,
        terms = ?pattern.terms().iter().map(Term::raw).collect::<Vec<_>>(),
        "tokenized filter pattern"
    );
    if pattern.terms().iter().any(Term::is_degenerate) {
        tracing::warn!(
            "pattern has unquoted terms with special characters; they never match, quote them"
        );
    }
    Ok(pattern)
}

fn exit_code(selected: bool) -> ExitCode {
    if selected {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_NO_MATCH)
    }
}

/// Parse the command line and run the selected command
///
/// Returns exit status 0 when something was selected and 1 when nothing was.
pub fn run() -> anyhow::Result<ExitCode> {
    let cli = cli_parse();
    init_tracing(cli.verbose, cli.quiet);

    let config = config::load_config(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(path) = &cli.config {
        tracing::info!(path = %path.display(), "loaded config");
    }

    let format = cli.format.unwrap_or(config.format);
    let color = apply_color_mode(cli.color.unwrap_or(config.color));

    match &cli.command {
        Commands::Grep {
            pattern,
            files,
            invert_match,
            count,
            line_number,
            max_count,
        } => {
            let pattern = compile_pattern(pattern, &config)?;
            let options = ScanOptions::new()
                .invert(*invert_match)
                .count_only(*count)
                .max_matches(*max_count);

            let reports: Vec<ScanReport> = if files.is_empty() {
                vec![scan_stdin(&pattern, &options)?]
            } else {
                files
                    .iter()
                    .map(|file| scan_path(file, &pattern, &options))
                    .collect::<Result<_, _>>()?
            };
            let selected = reports.iter().any(|r| r.matched_lines > 0);

            if !cli.quiet {
                match format {
                    OutputFormat::Text => {
                        let display = DisplayOptions {
                            line_numbers: *line_number || config.line_numbers,
                            show_source: reports.len() > 1,
                            count_only: *count,
                            highlight: color && !*invert_match,
                        };
                        print!("{}", output::format_scan_text(&reports, &pattern, &display));
                    }
                    OutputFormat::Json => {
                        let value = output::generate_scan_json(&reports, &pattern);
                        println!("{}", serde_json::to_string_pretty(&value)?);
                    }
                }
            }

            Ok(exit_code(selected))
        }
        Commands::Explain { pattern } => {
            let pattern = compile_pattern(pattern, &config)?;
            match format {
                OutputFormat::Text => print!("{}", output::format_terms_text(&pattern)),
                OutputFormat::Json => {
                    let value = output::generate_terms_json(&pattern);
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { pattern, line } => {
            let matched = is_cloudwatch_log_filter_match(line, pattern);
            tracing::debug!(pattern = %pattern, matched, "checked line");

            if !cli.quiet {
                match format {
                    OutputFormat::Text => println!("{matched}"),
                    OutputFormat::Json => {
                        let value = serde_json::json!({
                            "pattern": pattern,
                            "line": line,
                            "matched": matched,
                        });
                        println!("{}", serde_json::to_string_pretty(&value)?);
                    }
                }
            }

            Ok(exit_code(matched))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pattern: Option<&str>, saved: Option<&str>) -> PatternArgs {
        PatternArgs {
            pattern: pattern.map(str::to_string),
            saved: saved.map(str::to_string),
        }
    }

    #[test]
    fn test_resolve_inline_pattern() {
        let config = FilterConfig::default();
        assert_eq!(
            resolve_pattern(&args(Some("ERROR"), None), &config).unwrap(),
            "ERROR"
        );
    }

    #[test]
    fn test_resolve_saved_pattern() {
        let mut config = FilterConfig::default();
        config
            .filters
            .insert("errors".to_string(), "?ERROR ?FATAL".to_string());

        assert_eq!(
            resolve_pattern(&args(None, Some("errors")), &config).unwrap(),
            "?ERROR ?FATAL"
        );
        assert!(resolve_pattern(&args(None, Some("other")), &config).is_err());
    }
}
