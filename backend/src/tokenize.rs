//! Tier tokenization.

/// Split cleaned tier text on runs of whitespace.
///
/// Empty or all-whitespace input yields an empty vector, never a vector
/// holding one empty string.
pub fn words(text: &str) -> Vec<String> {
    text.split_whitespace().map(|w| w.to_string()).collect()
}

/// Split on whitespace plus corpus-specific separator characters, such as
/// the `=` clitic boundary. Separator splits never yield empty tokens.
pub fn words_with_separators(text: &str, separators: &[char]) -> Vec<String> {
    if separators.is_empty() {
        return words(text);
    }

    text.split(|c: char| c.is_whitespace() || separators.contains(&c))
        .filter(|w| !w.is_empty())
        .map(|w| w.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_empty_vec() {
        assert_eq!(words(""), Vec::<String>::new());
        assert_eq!(words("   "), Vec::<String>::new());
    }

    #[test]
    fn test_whitespace_runs() {
        assert_eq!(words("ha  ho\tda"), vec!["ha", "ho", "da"]);
    }

    #[test]
    fn test_clitic_separator() {
        assert_eq!(
            words_with_separators("orip=hon ma", &['=']),
            vec!["orip", "hon", "ma"]
        );
    }
}
