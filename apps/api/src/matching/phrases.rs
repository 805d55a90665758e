//! Free-text filter normalization.

use std::collections::HashSet;

use serde::Deserialize;

/// Filter text as it arrives in a request body: either one string to split
/// on delimiters, or an already-split list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PhraseInput {
    Many(Vec<serde_json::Value>),
    One(String),
}

/// Upper bound on phrases taken from one input value.
pub const MAX_PHRASES: usize = 10;

/// Normalizes raw filter text into a bounded, order-preserving list of unique
/// trimmed phrases. Empty input yields an empty list — "no filter on this
/// field", not "match nothing".
pub fn extract_phrases(raw: &PhraseInput, max_count: usize) -> Vec<String> {
    let pieces: Vec<String> = match raw {
        PhraseInput::Many(values) => values.iter().filter_map(coerce_to_string).collect(),
        PhraseInput::One(text) => text
            .split(['\n', ',', ';', '|'])
            .map(str::to_owned)
            .collect(),
    };

    let mut seen = HashSet::new();
    let mut phrases = Vec::new();
    for piece in pieces {
        let trimmed = piece.trim();
        if trimmed.is_empty() || !seen.insert(trimmed.to_owned()) {
            continue;
        }
        phrases.push(trimmed.to_owned());
        if phrases.len() == max_count {
            break;
        }
    }
    phrases
}

/// Scalar list elements are kept; nested structures and nulls are dropped
/// rather than stringified.
fn coerce_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
