//! Path-expression parsing and nested fragment construction.
//!
//! A path expression names a single nested field using dot notation
//! (`a.b.c`), bracket notation (`a["b"]["c"]`, quotes optional), or a mix
//! of both. Expressions are normalized into one ordered token sequence
//! which can then be expanded into a nested object fragment carrying an
//! override value at its leaf.

use serde_json::{Map, Value};

use crate::coerce::Coercion;

/// Parses a path expression into its ordered key tokens.
///
/// Bracket groups are split out first; each group contributes its inner
/// text (minus any surrounding quotes) as one token, and text between
/// groups contributes a token of its own. Dot-splitting is applied only
/// when the bracket pass yields a single token, so `a.b.c` and
/// `a["b"]["c"]` produce the same sequence while the leading segment of a
/// mixed expression like `a.b["c"]` stays a single `a.b` token.
///
/// An empty expression yields an empty sequence.
pub fn parse_path(expression: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut segment = String::new();
    let mut chars = expression.chars();

    while let Some(c) = chars.next() {
        match c {
            '[' => {
                if !segment.is_empty() {
                    tokens.push(std::mem::take(&mut segment));
                }

                let mut inner = String::new();
                for c in chars.by_ref() {
                    if c == ']' {
                        break;
                    }

                    inner.push(c);
                }

                let inner = inner.trim_matches(|c| c == '\'' || c == '"');
                if !inner.is_empty() {
                    tokens.push(inner.to_string());
                }
            },
            // stray closing bracket outside a group, skip it
            ']' => {},
            _ => segment.push(c),
        }
    }

    if !segment.is_empty() {
        tokens.push(segment);
    }

    // no bracket syntax was in play, fall back to dot notation
    if tokens.len() == 1 {
        let only = tokens.remove(0);
        tokens = only
            .split('.')
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
    }

    tokens
}

/// Builds a nested mapping fragment assigning a coerced value at the
/// terminal token. Every non-terminal token maps to a single-entry
/// mapping one level deeper. Empty token sequences produce an empty
/// mapping, which merges as a no-op.
pub fn build_fragment(tokens: &[String], value: &str, coercion: Coercion) -> Value {
    if tokens.is_empty() {
        return Value::Object(Map::new());
    }

    let mut fragment = coercion.apply(value);

    for token in tokens.iter().rev() {
        let mut level = Map::new();
        level.insert(token.clone(), fragment);
        fragment = Value::Object(level);
    }

    fragment
}
