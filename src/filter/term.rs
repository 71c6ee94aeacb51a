use serde::Serialize;
use std::fmt;

/// How a term takes part in the overall match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TermKind {
    /// No sigil: the line must contain the term
    Required,
    /// `?` sigil: a hit satisfies the whole pattern
    Optional,
    /// `-` sigil: a hit rejects the whole pattern
    Excluded,
}

impl TermKind {
    /// Get the canonical name of this term kind
    pub fn canonical_name(&self) -> &'static str {
        match self {
            TermKind::Required => "required",
            TermKind::Optional => "optional",
            TermKind::Excluded => "excluded",
        }
    }
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Separate the leading sigil from a raw term
pub(crate) fn split_sigil(raw: &str) -> (TermKind, &str) {
    if let Some(rest) = raw.strip_prefix('?') {
        (TermKind::Optional, rest)
    } else if let Some(rest) = raw.strip_prefix('-') {
        (TermKind::Excluded, rest)
    } else {
        (TermKind::Required, raw)
    }
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// The content of a `"..."` term, or `None` when it is not quoted
///
/// A phrase cannot span lines: a line terminator inside the quotes makes the
/// term an unquoted one.
fn unquote(pattern: &str) -> Option<&str> {
    if pattern.len() >= 2 && pattern.starts_with('"') && pattern.ends_with('"') {
        let inner = &pattern[1..pattern.len() - 1];
        (!inner.contains(is_line_terminator)).then_some(inner)
    } else {
        None
    }
}

fn is_word(pattern: &str) -> bool {
    pattern
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Unicode whitespace, except NEL, plus the byte order mark
fn is_blank_char(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

fn is_blank(text: &str) -> bool {
    text.chars().all(is_blank_char)
}

/// Check a sigil-free pattern against a log line
pub(crate) fn contains(log: &str, pattern: &str) -> bool {
    match unquote(pattern) {
        Some(phrase) => is_blank(phrase) || log.contains(phrase),
        None => is_word(pattern) && log.contains(pattern),
    }
}

/// A single term of a filter pattern, e.g. `ERROR`, `?WARN` or `-"user 42"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    raw: String,
    kind: TermKind,
}

impl Term {
    /// Parse a single raw term, e.g. `?ERROR` or `-"user 42"`
    pub fn parse(raw: &str) -> Self {
        let (kind, _) = split_sigil(raw);
        Term {
            raw: raw.to_string(),
            kind,
        }
    }

    /// The term exactly as written in the expression
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Kind given by the leading sigil
    pub fn kind(&self) -> TermKind {
        self.kind
    }

    fn body(&self) -> &str {
        split_sigil(&self.raw).1
    }

    /// Whether the term is enclosed in double quotes
    pub fn is_phrase(&self) -> bool {
        unquote(self.body()).is_some()
    }

    /// The text searched for in the line, without sigil or quotes
    pub fn text(&self) -> &str {
        let body = self.body();
        unquote(body).unwrap_or(body)
    }

    /// Unquoted terms with special characters can never match
    pub fn is_degenerate(&self) -> bool {
        !self.is_phrase() && !is_word(self.body())
    }

    /// Terms that are contained in every line: blank phrases and bare sigils
    pub fn is_wildcard(&self) -> bool {
        !self.is_degenerate() && is_blank(self.text())
    }

    /// Whether the line contains this term, ignoring its kind
    pub fn is_contained_in(&self, log: &str) -> bool {
        contains(log, self.body())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sigils() {
        assert_eq!(Term::parse("ERROR").kind(), TermKind::Required);
        assert_eq!(Term::parse("?ERROR").kind(), TermKind::Optional);
        assert_eq!(Term::parse("-ERROR").kind(), TermKind::Excluded);
        assert_eq!(Term::parse("-ERROR").text(), "ERROR");
    }

    #[test]
    fn test_only_the_first_sigil_counts() {
        let term = Term::parse("?-x");
        assert_eq!(term.kind(), TermKind::Optional);
        assert_eq!(term.text(), "-x");
        assert!(term.is_degenerate());
    }

    #[test]
    fn test_phrase_text_is_unquoted() {
        let term = Term::parse(r#"?"bad request""#);
        assert!(term.is_phrase());
        assert_eq!(term.text(), "bad request");
        assert!(!term.is_degenerate());
    }

    #[test]
    fn test_single_quote_char_is_not_a_phrase() {
        let term = Term::parse("\"");
        assert!(!term.is_phrase());
        assert!(term.is_degenerate());
        assert!(!term.is_contained_in("\""));
    }

    #[test]
    fn test_unquoted_special_characters_never_match() {
        assert!(!contains("#Cloud watch", "#Cloud"));
        assert!(!contains("a-b", "a-b"));
        assert!(contains("#Cloud watch", "\"#Cloud\""));
        assert!(contains("snake_case here", "snake_case"));
    }

    #[test]
    fn test_non_ascii_letters_must_be_quoted() {
        assert!(!contains("café", "café"));
        assert!(contains("café", "\"café\""));
    }

    #[test]
    fn test_blank_phrases_are_wildcards() {
        assert!(contains("", "\"\""));
        assert!(contains("", "\" \""));
        assert!(contains("anything", "\"\t \""));
        assert!(Term::parse("\"  \"").is_wildcard());
        assert!(Term::parse("?").is_wildcard());
        assert!(!Term::parse("ERROR").is_wildcard());
    }

    #[test]
    fn test_phrases_cannot_span_lines() {
        assert!(!contains("anything", "\"\n\""));
        assert!(!contains("a\nb", "\"a\nb\""));
        assert!(!contains("a\r\nb", "\"a\r\nb\""));
        assert!(!contains("a\u{2028}b", "\"a\u{2028}b\""));
        assert!(!contains("a\u{2029}b", "\"a\u{2029}b\""));

        let term = Term::parse("?\"\n\"");
        assert!(!term.is_phrase());
        assert!(term.is_degenerate());
        assert!(!term.is_wildcard());
    }

    #[test]
    fn test_blank_phrase_whitespace_set() {
        assert!(contains("x", "\"\u{feff}\""));
        assert!(contains("x", "\"\u{a0}\u{3000}\t\""));
        assert!(!contains("x", "\"\u{85}\""));
        assert!(contains("a\u{85}b", "\"\u{85}\""));
        assert!(Term::parse("\"\u{feff} \"").is_wildcard());
        assert!(!Term::parse("\"\u{85}\"").is_wildcard());
    }

    #[test]
    fn test_containment_is_case_sensitive() {
        assert!(contains("Cloudwatch", "Cloudwatch"));
        assert!(!contains("Cloudwatch", "cloudwatch"));
        assert!(!contains("#Cloud watch", "\"#cloud\""));
    }
}
