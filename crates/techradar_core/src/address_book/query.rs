//! Free-text lookup query parsing.

use crate::radar::error::ValidationError;
use std::collections::HashSet;

/// Splits a comma-separated query into trimmed, non-empty, deduplicated
/// tokens.
///
/// Deduplication is case-insensitive; the first-seen casing and the
/// first-seen order are kept.
///
/// # Errors
/// - `MissingInput` when no token survives normalization.
pub fn parse_query(raw: &str) -> Result<Vec<String>, ValidationError> {
    let tokens = normalize_tokens(raw.split(','));
    if tokens.is_empty() {
        return Err(ValidationError::MissingInput);
    }
    Ok(tokens)
}

/// Same as `parse_query` for inputs already supplied as a list (repeated
/// query parameters). Each item may itself contain commas.
pub fn parse_query_list<S: AsRef<str>>(raw: &[S]) -> Result<Vec<String>, ValidationError> {
    let tokens = normalize_tokens(raw.iter().flat_map(|item| item.as_ref().split(',')));
    if tokens.is_empty() {
        return Err(ValidationError::MissingInput);
    }
    Ok(tokens)
}

fn normalize_tokens<'a>(pieces: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tokens = Vec::new();
    for piece in pieces {
        let trimmed = piece.trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_lowercase()) {
            tokens.push(trimmed.to_string());
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::{parse_query, parse_query_list};
    use crate::radar::error::ValidationError;

    #[test]
    fn trims_and_drops_empty_pieces() {
        assert_eq!(
            parse_query("  octocat  ,   , anotheruser  ").unwrap(),
            vec!["octocat", "anotheruser"]
        );
    }

    #[test]
    fn single_token_without_commas() {
        assert_eq!(parse_query(" octocat ").unwrap(), vec!["octocat"]);
    }

    #[test]
    fn dedupes_case_insensitively_keeping_first_casing() {
        assert_eq!(
            parse_query("OctoCat, other, octocat, OTHER").unwrap(),
            vec!["OctoCat", "other"]
        );
    }

    #[test]
    fn blank_queries_are_missing_input() {
        assert_eq!(parse_query(" , , ,").unwrap_err(), ValidationError::MissingInput);
        assert_eq!(parse_query("").unwrap_err(), ValidationError::MissingInput);
        assert_eq!(
            parse_query_list::<&str>(&[]).unwrap_err(),
            ValidationError::MissingInput
        );
    }

    #[test]
    fn list_input_is_flattened() {
        assert_eq!(
            parse_query_list(&["a, b", " ", "B,c"]).unwrap(),
            vec!["a", "b", "c"]
        );
    }
}
