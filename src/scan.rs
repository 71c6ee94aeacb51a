use crate::filter::FilterPattern;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Name used for standard input in reports
pub const STDIN_NAME: &str = "(standard input)";

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read '{source_name}': {source}")]
    Read {
        source_name: String,
        #[source]
        source: io::Error,
    },
}

/// Options controlling which lines are selected and what is kept
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    pub invert: bool,
    pub count_only: bool,
    pub max_matches: Option<usize>,
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn count_only(mut self, count_only: bool) -> Self {
        self.count_only = count_only;
        self
    }

    pub fn max_matches(mut self, max_matches: Option<usize>) -> Self {
        self.max_matches = max_matches;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedLine {
    /// 1-based line number within the source
    pub line: usize,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub source: String,
    pub total_lines: usize,
    pub matched_lines: usize,
    pub matches: Vec<MatchedLine>,
}

impl ScanReport {
    fn new(source: &str) -> Self {
        ScanReport {
            source: source.to_string(),
            total_lines: 0,
            matched_lines: 0,
            matches: Vec::new(),
        }
    }
}

/// Evaluate every line of `reader` against `pattern`
///
/// Line terminators (`\n` or `\r\n`) are not part of the matched text, and
/// lines that are not valid UTF-8 are decoded lossily.
pub fn scan_reader<R: BufRead>(
    mut reader: R,
    source_name: &str,
    pattern: &FilterPattern,
    options: &ScanOptions,
) -> Result<ScanReport, ScanError> {
    let mut report = ScanReport::new(source_name);
    let mut buf = Vec::new();

    loop {
        if options
            .max_matches
            .is_some_and(|max| report.matched_lines >= max)
        {
            tracing::debug!(source = source_name, "max count reached");
            break;
        }

        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| ScanError::Read {
                source_name: source_name.to_string(),
                source,
            })?;
        if read == 0 {
            break;
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }

        let text = String::from_utf8_lossy(&buf);
        report.total_lines += 1;

        if pattern.matches(&text) != options.invert {
            report.matched_lines += 1;
            if !options.count_only {
                report.matches.push(MatchedLine {
                    line: report.total_lines,
                    text: text.into_owned(),
                });
            }
        }
    }

    tracing::debug!(
        source = source_name,
        total = report.total_lines,
        matched = report.matched_lines,
        "scan finished"
    );
    Ok(report)
}

/// Scan a file, or standard input when `path` is `-`
pub fn scan_path(
    path: &Path,
    pattern: &FilterPattern,
    options: &ScanOptions,
) -> Result<ScanReport, ScanError> {
    if path == Path::new("-") {
        return scan_stdin(pattern, options);
    }

    let path_display = path.display().to_string();
    tracing::debug!(path = %path_display, "opening log source");
    let file = File::open(path).map_err(|source| ScanError::Open {
        path: path_display.clone(),
        source,
    })?;
    scan_reader(BufReader::new(file), &path_display, pattern, options)
}

/// Scan standard input, reported as `(standard input)`
pub fn scan_stdin(pattern: &FilterPattern, options: &ScanOptions) -> Result<ScanReport, ScanError> {
    scan_reader(io::stdin().lock(), STDIN_NAME, pattern, options)
}
