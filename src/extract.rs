//! Field extraction helpers for raw OpenAlex JSON.
//!
//! Two flavours of access:
//! - *defended* lookups ([`get_or_default`], [`abstract_text`]) never fail and
//!   fall back to a default when any step of the path is missing or mistyped;
//! - *required* lookups ([`require_str`], [`require_i64`]) return
//!   [`OpenAlexError::MalformedRecord`] naming the dotted path.

use crate::error::{OpenAlexError, Result};
use serde_json::Value;

/// Walk `path` through nested objects.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.as_object()?.get(*key))
}

/// String at `path`, or `default` when absent, null or not a string.
pub fn get_or_default(value: &Value, path: &[&str], default: &str) -> String {
    lookup(value, path)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

/// String at `path`, or a `MalformedRecord` error.
pub fn require_str(value: &Value, path: &[&str], record: &'static str) -> Result<String> {
    lookup(value, path)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| OpenAlexError::malformed(record, path.join(".")))
}

/// Integer at `path`, or a `MalformedRecord` error.
pub fn require_i64(value: &Value, path: &[&str], record: &'static str) -> Result<i64> {
    lookup(value, path)
        .and_then(Value::as_i64)
        .ok_or_else(|| OpenAlexError::malformed(record, path.join(".")))
}

/// Final path segment of an OpenAlex id URI (`https://openalex.org/W9` -> `W9`).
///
/// Ids that are already bare are returned unchanged.
pub fn last_path_segment(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}

/// Abstract of a work, or `""`.
///
/// Prefers a plain `abstract` string; falls back to rebuilding the text from
/// `abstract_inverted_index`, which is what the live API ships.
pub fn abstract_text(work: &Value) -> String {
    if let Some(text) = lookup(work, &["abstract"]).and_then(Value::as_str) {
        return text.to_string();
    }
    lookup(work, &["abstract_inverted_index"])
        .map(reconstruct_abstract)
        .unwrap_or_default()
}

/// Reconstruct abstract text from inverted index
/// OpenAlex provides abstract as inverted index for legal reasons.
fn reconstruct_abstract(inverted_index: &Value) -> String {
    let Some(obj) = inverted_index.as_object() else {
        return String::new();
    };

    let mut words: Vec<(i64, &str)> = Vec::new();
    for (word, positions) in obj {
        if let Some(pos_array) = positions.as_array() {
            words.extend(
                pos_array
                    .iter()
                    .filter_map(Value::as_i64)
                    .map(|p| (p, word.as_str())),
            );
        }
    }

    words.sort_by_key(|(pos, _)| *pos);
    words.iter().map(|(_, w)| *w).collect::<Vec<_>>().join(" ")
}
