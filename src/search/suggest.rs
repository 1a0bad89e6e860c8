//! Suggester response parsing / 建议词响应解析
//!
//! Payload shape: `suggest -> {dictionary} -> {term}`, where the term level
//! is either the suggestion list itself or Solr's
//! `{"numFound": n, "suggestions": [...]}` wrapper. Every suggestion object
//! carries a `term` string.

use serde_json::Value;

use crate::error::{IndexError, Result};

const SUGGEST_KEY: &str = "suggest";

/// Flatten a suggester payload into terms, keeping the engine's ranking.
///
/// A missing level is a `MalformedResponse`, never an empty list; an empty
/// suggestion list is a valid "no suggestions" answer.
pub fn parse_suggestions(payload: &Value, dictionary: &str, term: &str) -> Result<Vec<String>> {
    let suggest = payload
        .get(SUGGEST_KEY)
        .ok_or_else(|| malformed(format!("missing '{}' field", SUGGEST_KEY)))?;
    let by_dictionary = suggest
        .get(dictionary)
        .ok_or_else(|| malformed(format!("missing suggester '{}'", dictionary)))?;
    let by_term = by_dictionary
        .get(term)
        .ok_or_else(|| malformed(format!("missing entry for term '{}'", term)))?;

    let suggestions = match by_term {
        Value::Array(list) => list,
        Value::Object(obj) => obj
            .get("suggestions")
            .and_then(Value::as_array)
            .ok_or_else(|| malformed(format!("no suggestion list for term '{}'", term)))?,
        _ => return Err(malformed(format!("unexpected value for term '{}'", term))),
    };

    suggestions
        .iter()
        .map(|item| {
            item.get("term")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| malformed("suggestion without a 'term' string".to_string()))
        })
        .collect()
}

fn malformed(msg: String) -> IndexError {
    IndexError::MalformedResponse(msg)
}
