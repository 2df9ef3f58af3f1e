//! Parsing of project and group identifier lists.

use std::collections::BTreeSet;

use tracing::warn;

/// Identifiers parsed from a delimited list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedIds {
    pub ids: BTreeSet<u64>,
    /// Tokens that were not valid identifiers, in input order.
    pub malformed: Vec<String>,
}

/// Parse a comma or whitespace delimited list of numeric identifiers.
///
/// Returns `None` for empty input, meaning no identifiers are configured.
/// Malformed tokens are logged and skipped; they never abort the parse.
pub fn parse_ids(raw: &str) -> Option<ParsedIds> {
    if raw.trim().is_empty() {
        return None;
    }

    let mut parsed = ParsedIds::default();
    for token in raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
    {
        match token.parse::<u64>() {
            Ok(id) => {
                parsed.ids.insert(id);
            }
            Err(_) => {
                warn!("\"{token}\" is not a valid id");
                parsed.malformed.push(token.to_string());
            }
        }
    }

    Some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_means_no_ids() {
        assert_eq!(parse_ids(""), None);
        assert_eq!(parse_ids("   "), None);
    }

    #[test]
    fn duplicates_collapse_and_bad_tokens_are_skipped() {
        let parsed = parse_ids("1,2,2,x,3").unwrap();
        assert_eq!(parsed.ids, BTreeSet::from([1, 2, 3]));
        assert_eq!(parsed.malformed, vec!["x".to_string()]);
    }

    #[test]
    fn spaces_and_commas_both_delimit() {
        let parsed = parse_ids("4, 5 6,,7").unwrap();
        assert_eq!(parsed.ids, BTreeSet::from([4, 5, 6, 7]));
        assert!(parsed.malformed.is_empty());
    }

    #[test]
    fn negative_ids_are_malformed() {
        let parsed = parse_ids("-1,8").unwrap();
        assert_eq!(parsed.ids, BTreeSet::from([8]));
        assert_eq!(parsed.malformed, vec!["-1".to_string()]);
    }

    #[test]
    fn only_bad_tokens_gives_an_empty_set() {
        let parsed = parse_ids("abc").unwrap();
        assert!(parsed.ids.is_empty());
        assert_eq!(parsed.malformed.len(), 1);
    }
}
