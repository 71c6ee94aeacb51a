use super::term::{Term, TermKind, contains, split_sigil};
use super::tokenizer::tokenize;
use serde::{Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Check whether `log_line` matches the CloudWatch filter pattern `filter_expression`
///
/// Terms are evaluated left to right. An optional term that hits accepts the
/// line immediately, an excluded term that hits rejects it immediately, and a
/// required term that misses rejects it immediately. Otherwise the line
/// matches only if at least one required term was found, so an empty pattern
/// or one made only of optional and excluded terms never matches by itself.
pub fn is_cloudwatch_log_filter_match(log_line: &str, filter_expression: &str) -> bool {
    evaluate(log_line, tokenize(filter_expression))
}

fn evaluate<'a>(log_line: &str, raw_terms: impl IntoIterator<Item = &'a str>) -> bool {
    let mut required_hits = 0usize;

    for raw in raw_terms {
        let (kind, pattern) = split_sigil(raw);
        let hit = contains(log_line, pattern);
        match kind {
            TermKind::Optional if hit => return true,
            TermKind::Excluded if hit => return false,
            TermKind::Required if !hit => return false,
            TermKind::Required => required_hits += 1,
            TermKind::Optional | TermKind::Excluded => {}
        }
    }

    required_hits > 0
}

/// A filter pattern tokenized once, for matching many lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPattern {
    expression: String,
    terms: Vec<Term>,
}

impl FilterPattern {
    /// Tokenize and classify a filter expression
    pub fn new(expression: &str) -> Self {
        FilterPattern {
            expression: expression.to_string(),
            terms: tokenize(expression).into_iter().map(Term::parse).collect(),
        }
    }

    /// The expression as originally written
    pub fn as_str(&self) -> &str {
        &self.expression
    }

    /// Terms in the order they are evaluated
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Same result as [`is_cloudwatch_log_filter_match`] for this expression
    pub fn matches(&self, log_line: &str) -> bool {
        evaluate(log_line, self.terms.iter().map(Term::raw))
    }

    /// Byte ranges of the line covered by required or optional terms
    ///
    /// Ranges are sorted and overlapping ones are merged. Excluded, degenerate
    /// and wildcard terms contribute nothing.
    pub fn highlight_ranges(&self, log_line: &str) -> Vec<Range<usize>> {
        let mut ranges: Vec<Range<usize>> = self
            .terms
            .iter()
            .filter(|t| {
                t.kind() != TermKind::Excluded && !t.is_degenerate() && !t.is_wildcard()
            })
            .flat_map(|t| {
                let text = t.text();
                log_line
                    .match_indices(text)
                    .map(move |(start, _)| start..start + text.len())
            })
            .collect();
        ranges.sort_by_key(|r| (r.start, r.end));

        let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
        for range in ranges {
            match merged.last_mut() {
                Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
                _ => merged.push(range),
            }
        }
        merged
    }
}

impl FromStr for FilterPattern {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FilterPattern::new(s))
    }
}

impl fmt::Display for FilterPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

impl Serialize for FilterPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.expression)
    }
}
