//! CloudWatch Logs filter patterns
//!
//! This module decides whether a single log line matches a filter pattern
//! written in the CloudWatch Logs term syntax.
//!
//! # Syntax
//!
//! ```text
//! term                 Required: the line must contain the term
//! ?term                Optional: if the line contains it, the whole pattern matches
//! -term                Excluded: if the line contains it, the whole pattern fails
//! "exact phrase"       Quoted terms may contain spaces and special characters
//! ```
//!
//! Matching is case sensitive. Unquoted terms may only contain letters,
//! digits and `_`; anything else has to be quoted or the term never matches.
//! A quoted phrase that is empty or only whitespace matches every line.
//!
//! # Examples
//!
//! ```text
//! ERROR                        Lines containing ERROR
//! ERROR ARGUMENTS              Lines containing both ERROR and ARGUMENTS
//! ?ERROR ?WARN                 Lines containing ERROR or WARN
//! ERROR -ARGUMENTS             Lines with ERROR but without ARGUMENTS
//! "[ERROR 419]"                Lines containing the literal text [ERROR 419]
//! ```

pub mod matcher;
pub mod term;
pub mod tokenizer;

pub use matcher::{FilterPattern, is_cloudwatch_log_filter_match};
pub use term::{Term, TermKind};
pub use tokenizer::tokenize;
