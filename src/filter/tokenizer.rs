/// Split a filter expression into its raw terms
///
/// Terms are separated by spaces. A double quote toggles phrase mode for the
/// term being read, and spaces inside a phrase belong to the term. Runs of
/// spaces never produce empty terms, and an unbalanced quote simply extends
/// the last term to the end of the input.
pub fn tokenize(filter: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut in_phrase = false;

    for (i, c) in filter.char_indices() {
        match c {
            ' ' if !in_phrase => {
                if let Some(s) = start.take() {
                    tokens.push(&filter[s..i]);
                }
            }
            _ => {
                start.get_or_insert(i);
                if c == '"' {
                    in_phrase = !in_phrase;
                }
            }
        }
    }

    if let Some(s) = start {
        tokens.push(&filter[s..]);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_spaces() {
        assert_eq!(tokenize("ERROR ARGUMENTS"), vec!["ERROR", "ARGUMENTS"]);
        assert_eq!(tokenize("?ERROR -WARN"), vec!["?ERROR", "-WARN"]);
    }

    #[test]
    fn test_runs_of_spaces_produce_no_empty_tokens() {
        assert_eq!(tokenize("  a   b  "), vec!["a", "b"]);
        assert!(tokenize("").is_empty());
        assert!(tokenize("     ").is_empty());
    }

    #[test]
    fn test_quoted_phrase_is_kept_whole() {
        assert_eq!(
            tokenize(r#"ERROR "bad request" -"user 42""#),
            vec!["ERROR", r#""bad request""#, r#"-"user 42""#]
        );
        assert_eq!(tokenize(r#""" " ""#), vec![r#""""#, r#"" ""#]);
    }

    #[test]
    fn test_phrase_state_resets_between_tokens() {
        assert_eq!(
            tokenize(r##""#Cloud" #watch"##),
            vec![r##""#Cloud""##, "#watch"]
        );
        assert_eq!(tokenize(r#"a"b c"d e"#), vec![r#"a"b c"d"#, "e"]);
    }

    #[test]
    fn test_unbalanced_quote_runs_to_end() {
        assert_eq!(tokenize(r#"x "open phrase  y"#), vec!["x", r#""open phrase  y"#]);
    }

    #[test]
    fn test_only_space_is_a_delimiter() {
        assert_eq!(tokenize("a\tb\nc"), vec!["a\tb\nc"]);
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(tokenize("héllo \"wörld ü\""), vec!["héllo", "\"wörld ü\""]);
    }
}
