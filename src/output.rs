use crate::filter::{FilterPattern, Term, TermKind};
use crate::scan::ScanReport;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use serde_json::{Value, json};
use std::fmt::Write;
use std::ops::Range;

/// How scan results are laid out in text mode
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayOptions {
    pub line_numbers: bool,
    pub show_source: bool,
    pub count_only: bool,
    pub highlight: bool,
}

/// Table with the UTF-8 preset and the given header row
pub fn create_styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| Cell::new(h)).collect::<Vec<_>>());
    table
}

/// Wrap the given byte ranges of `line` in highlight colors
pub fn highlight_line(line: &str, ranges: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(line.len());
    let mut cursor = 0;
    for range in ranges {
        out.push_str(&line[cursor..range.start]);
        let _ = write!(out, "{}", line[range.clone()].red().bold());
        cursor = range.end;
    }
    out.push_str(&line[cursor..]);
    out
}

/// Render scan reports as grep-like text, or per-source counts
pub fn format_scan_text(
    reports: &[ScanReport],
    pattern: &FilterPattern,
    options: &DisplayOptions,
) -> String {
    let mut out = String::new();

    for report in reports {
        let prefix = if options.show_source {
            format!("{}:", report.source.magenta())
        } else {
            String::new()
        };

        if options.count_only {
            let _ = writeln!(out, "{prefix}{}", report.matched_lines);
            continue;
        }

        for matched in &report.matches {
            out.push_str(&prefix);
            if options.line_numbers {
                let _ = write!(out, "{}:", matched.line.to_string().green());
            }
            if options.highlight {
                let ranges = pattern.highlight_ranges(&matched.text);
                out.push_str(&highlight_line(&matched.text, &ranges));
            } else {
                out.push_str(&matched.text);
            }
            out.push('\n');
        }
    }

    out
}

/// JSON document with the pattern and every scanned source
pub fn generate_scan_json(reports: &[ScanReport], pattern: &FilterPattern) -> Value {
    json!({
        "pattern": pattern,
        "sources": reports,
    })
}

fn term_note(term: &Term) -> &'static str {
    if term.is_degenerate() {
        "never matches: quote special characters"
    } else if term.is_wildcard() {
        "matches every line"
    } else {
        ""
    }
}

fn kind_cell(kind: TermKind) -> Cell {
    let name = kind.canonical_name();
    let styled = match kind {
        TermKind::Required => name.bright_blue(),
        TermKind::Optional => name.yellow(),
        TermKind::Excluded => name.red(),
    };
    Cell::new(styled.to_string())
}

/// Term table printed by `explain`
pub fn format_terms_text(pattern: &FilterPattern) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", "Pattern:".bold(), pattern);

    if pattern.is_empty() {
        let _ = writeln!(out, "No terms. An empty pattern matches no lines.");
        return out;
    }

    let mut table = create_styled_table(&["#", "Term", "Kind", "Phrase", "Text", "Note"]);
    for (idx, term) in pattern.terms().iter().enumerate() {
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(term.raw()),
            kind_cell(term.kind()),
            Cell::new(if term.is_phrase() { "yes" } else { "no" }),
            Cell::new(term.text()),
            Cell::new(term_note(term)),
        ]);
    }
    let _ = writeln!(out, "{table}");

    if !pattern
        .terms()
        .iter()
        .any(|t| t.kind() == TermKind::Required)
    {
        let _ = writeln!(
            out,
            "No required terms: a line matches only when an optional term is found."
        );
    }

    out
}

/// Terms of a pattern with their derived properties, as JSON
pub fn generate_terms_json(pattern: &FilterPattern) -> Value {
    let terms: Vec<Value> = pattern
        .terms()
        .iter()
        .map(|term| {
            json!({
                "raw": term.raw(),
                "kind": term.kind(),
                "phrase": term.is_phrase(),
                "text": term.text(),
                "degenerate": term.is_degenerate(),
                "wildcard": term.is_wildcard(),
            })
        })
        .collect();

    json!({
        "pattern": pattern,
        "terms": terms,
    })
}
