//! Attribute diff used to highlight disagreement between two candidate records.
//!
//! The comparison is deliberately positional: both strings are split into
//! whitespace-delimited tokens (separators kept as their own tokens) and the
//! token at index `i` of `a` is compared with the token at index `i` of `b`.
//! There is no alignment search.
//!
//! Known limitation: a single token inserted into or removed from one side
//! shifts every later position, so tokens after it are reported as `Changed`
//! even when they appear, shifted, in the other string:
//!
//! ```
//! use review_core::diff::{compute_diff, DiffKind};
//!
//! let tokens = compute_diff("Jane Smith", "Jane A. Smith");
//! let kinds: Vec<DiffKind> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(kinds, vec![DiffKind::Equal, DiffKind::Equal, DiffKind::Changed]);
//! ```
use serde::Serialize;

/// Text shown when neither side has a value.
pub const EMPTY_PLACEHOLDER: &str = "N/A";

/// Classification of one diff token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    /// Same on both sides (case-insensitive)
    Equal,
    /// Present on one side only
    Added,
    /// Differs from its positional counterpart
    Changed,
}

/// One run of text with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffToken {
    pub text: String,
    pub kind: DiffKind,
}

impl DiffToken {
    fn new(text: impl Into<String>, kind: DiffKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// Compare `text_a` against `text_b`, returning tokens in `text_a` order.
///
/// - both empty: a single [`EMPTY_PLACEHOLDER`] token
/// - one empty: the other string as a single `Added` token
/// - equal ignoring case: the whole of `text_a` as a single `Equal` token
/// - otherwise: positional token comparison
pub fn compute_diff(text_a: &str, text_b: &str) -> Vec<DiffToken> {
    match (text_a.is_empty(), text_b.is_empty()) {
        (true, true) => return vec![DiffToken::new(EMPTY_PLACEHOLDER, DiffKind::Equal)],
        (false, true) => return vec![DiffToken::new(text_a, DiffKind::Added)],
        (true, false) => return vec![DiffToken::new(text_b, DiffKind::Added)],
        (false, false) => {}
    }

    if eq_ignore_case(text_a, text_b) {
        return vec![DiffToken::new(text_a, DiffKind::Equal)];
    }

    let tokens_b = tokenize(text_b);
    tokenize(text_a)
        .into_iter()
        .enumerate()
        .map(|(i, token)| {
            let kind = match tokens_b.get(i) {
                None => DiffKind::Added,
                Some(other) if eq_ignore_case(token, other) => DiffKind::Equal,
                Some(_) => DiffKind::Changed,
            };
            DiffToken::new(token, kind)
        })
        .collect()
}

/// True when any token is not `Equal`.
pub fn has_disagreement(tokens: &[DiffToken]) -> bool {
    tokens.iter().any(|t| t.kind != DiffKind::Equal)
}

/// Split into alternating word and whitespace runs.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;

    for (i, c) in text.char_indices() {
        let space = c.is_whitespace();
        match in_space {
            Some(prev) if prev != space => {
                tokens.push(&text[start..i]);
                start = i;
            }
            _ => {}
        }
        in_space = Some(space);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[DiffToken]) -> Vec<DiffKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_identical_strings_yield_single_equal_run() {
        let tokens = compute_diff("Jane Smith", "Jane Smith");
        assert_eq!(tokens, vec![DiffToken::new("Jane Smith", DiffKind::Equal)]);
        assert!(!has_disagreement(&tokens));
    }

    #[test]
    fn test_case_variants_are_equal() {
        let tokens = compute_diff("JANE smith", "jane SMITH");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, DiffKind::Equal);
        assert_eq!(tokens[0].text, "JANE smith");
    }

    #[test]
    fn test_inserted_token_shifts_later_positions() {
        let tokens = compute_diff("Jane Smith", "Jane A. Smith");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Jane", " ", "Smith"]);
        // "Smith" exists in B but sits at a different index.
        assert_eq!(
            kinds(&tokens),
            vec![DiffKind::Equal, DiffKind::Equal, DiffKind::Changed]
        );
        assert!(has_disagreement(&tokens));
    }

    #[test]
    fn test_tokens_past_end_of_b_are_added() {
        let tokens = compute_diff("Jane Ann Smith", "Jane");
        assert_eq!(
            kinds(&tokens),
            vec![
                DiffKind::Equal,
                DiffKind::Added,
                DiffKind::Added,
                DiffKind::Added,
                DiffKind::Added
            ]
        );
    }

    #[test]
    fn test_both_empty_yields_placeholder() {
        let tokens = compute_diff("", "");
        assert_eq!(tokens, vec![DiffToken::new(EMPTY_PLACEHOLDER, DiffKind::Equal)]);
    }

    #[test]
    fn test_one_side_empty_is_added() {
        assert_eq!(
            compute_diff("", "MIT"),
            vec![DiffToken::new("MIT", DiffKind::Added)]
        );
        assert_eq!(
            compute_diff("Stanford University", ""),
            vec![DiffToken::new("Stanford University", DiffKind::Added)]
        );
    }

    #[test]
    fn test_separators_are_preserved() {
        let tokens = compute_diff("Dept.  of\tPhysics", "Dept. of Physics");
        let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rebuilt, "Dept.  of\tPhysics");
        // Whitespace runs of different shape count as changed.
        assert_eq!(
            kinds(&tokens),
            vec![
                DiffKind::Equal,
                DiffKind::Changed,
                DiffKind::Equal,
                DiffKind::Changed,
                DiffKind::Equal
            ]
        );
    }

    #[test]
    fn test_tokenize_leading_whitespace() {
        assert_eq!(tokenize("  a b"), vec!["  ", "a", " ", "b"]);
        assert_eq!(tokenize("a"), vec!["a"]);
        assert!(tokenize("").is_empty());
    }
}
