//! Solr Cell (`/update/extract?extractOnly=true`) response parsing / 提取响应解析

use serde_json::{Map, Value};

use crate::error::{IndexError, Result};
use crate::models::ExtractedDocument;

const HEADER_KEY: &str = "responseHeader";
const METADATA_SUFFIX: &str = "_metadata";

/// Parse an extract-only response.
///
/// Content sits under the resource name (or `""` when the stream had none),
/// metadata under `{resource}_metadata` as a flat `[name, [values..], ...]`
/// list. Each value yields its own `(name, value)` pair so repeated fields
/// keep their order.
pub fn parse_extract_response(payload: &Value, resource_name: &str) -> Result<ExtractedDocument> {
    let obj = payload
        .as_object()
        .ok_or_else(|| IndexError::ExtractionFailed("extract response is not an object".to_string()))?;

    if let Some(error) = obj.get("error") {
        let msg = error
            .get("msg")
            .and_then(Value::as_str)
            .unwrap_or("extractor reported an error");
        return Err(IndexError::ExtractionFailed(msg.to_string()));
    }

    let content_key = find_content_key(obj, resource_name)
        .ok_or_else(|| IndexError::ExtractionFailed("no extracted content in response".to_string()))?;

    let content = obj
        .get(&content_key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();

    let metadata_key = format!("{}{}", content_key, METADATA_SUFFIX);
    let metadata = match obj.get(&metadata_key).or_else(|| {
        obj.iter()
            .find(|(k, _)| k.ends_with(METADATA_SUFFIX))
            .map(|(_, v)| v)
    }) {
        Some(raw) => parse_metadata(raw)?,
        None => Vec::new(),
    };

    Ok(ExtractedDocument { content, metadata })
}

fn find_content_key(obj: &Map<String, Value>, resource_name: &str) -> Option<String> {
    if obj.get(resource_name).map(Value::is_string).unwrap_or(false) {
        return Some(resource_name.to_string());
    }
    // Solr keys the content by stream name, which may differ from what we sent
    obj.iter()
        .find(|(k, v)| k.as_str() != HEADER_KEY && !k.ends_with(METADATA_SUFFIX) && v.is_string())
        .map(|(k, _)| k.clone())
}

fn parse_metadata(raw: &Value) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    match raw {
        // json.nl=flat (Solr default)
        Value::Array(items) => {
            if items.len() % 2 != 0 {
                return Err(IndexError::ExtractionFailed(
                    "metadata list has an odd number of items".to_string(),
                ));
            }
            for chunk in items.chunks(2) {
                let name = chunk[0].as_str().ok_or_else(|| {
                    IndexError::ExtractionFailed("metadata field name is not a string".to_string())
                })?;
                push_values(&mut pairs, name, &chunk[1]);
            }
        }
        // json.nl=map
        Value::Object(map) => {
            for (name, values) in map {
                push_values(&mut pairs, name, values);
            }
        }
        _ => {
            return Err(IndexError::ExtractionFailed(
                "metadata is neither a list nor a map".to_string(),
            ))
        }
    }
    Ok(pairs)
}

fn push_values(pairs: &mut Vec<(String, String)>, name: &str, values: &Value) {
    match values {
        Value::Array(list) => {
            for v in list {
                pairs.push((name.to_string(), value_to_string(v)));
            }
        }
        other => pairs.push((name.to_string(), value_to_string(other))),
    }
}

fn value_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_flat_metadata() {
        let payload = json!({
            "responseHeader": {"status": 0, "QTime": 12},
            "report.pdf": "\n\nQuarterly report\n",
            "report.pdf_metadata": [
                "stream_size", ["2048"],
                "Author", ["Alice", "Bob"],
                "Content-Type", ["application/pdf"]
            ]
        });

        let doc = parse_extract_response(&payload, "report.pdf").unwrap();
        assert_eq!(doc.content, "Quarterly report");
        assert_eq!(
            doc.metadata,
            vec![
                ("stream_size".to_string(), "2048".to_string()),
                ("Author".to_string(), "Alice".to_string()),
                ("Author".to_string(), "Bob".to_string()),
                ("Content-Type".to_string(), "application/pdf".to_string()),
            ]
        );
        assert_eq!(doc.content_type().as_deref(), Some("application/pdf"));
    }

    #[test]
    fn test_parse_map_metadata_and_unnamed_stream() {
        let payload = json!({
            "responseHeader": {"status": 0},
            "": "plain text body",
            "null_metadata": {"Content-Type": ["text/plain"]}
        });

        let doc = parse_extract_response(&payload, "notes.txt").unwrap();
        assert_eq!(doc.content, "plain text body");
        assert_eq!(doc.metadata, vec![("Content-Type".to_string(), "text/plain".to_string())]);
    }

    #[test]
    fn test_error_payload_is_extraction_failure() {
        let payload = json!({
            "responseHeader": {"status": 500},
            "error": {"msg": "TikaException", "code": 500}
        });
        match parse_extract_response(&payload, "x.doc") {
            Err(IndexError::ExtractionFailed(msg)) => assert_eq!(msg, "TikaException"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_content_is_extraction_failure() {
        let payload = json!({"responseHeader": {"status": 0}});
        assert!(matches!(
            parse_extract_response(&payload, "x.doc"),
            Err(IndexError::ExtractionFailed(_))
        ));
    }

    #[test]
    fn test_odd_metadata_list_rejected() {
        let payload = json!({
            "x.doc": "text",
            "x.doc_metadata": ["Author"]
        });
        assert!(parse_extract_response(&payload, "x.doc").is_err());
    }
}
