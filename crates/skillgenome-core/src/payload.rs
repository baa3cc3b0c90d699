//! Interpretation of raw generation output.
//!
//! The generation collaborator hands over either text (model output, possibly
//! wrapped in Markdown code fences) or an already-decoded JSON value. Both are
//! classified into exactly one `GenerationPayload` variant; anything that is
//! neither a graph nor an error object is rejected as malformed.

use serde_json::Value;
use tracing::warn;

use skillgenome_types::error::GenomeError;
use skillgenome_types::payload::{GenerationFailure, GenerationPayload, GraphDescription};

/// Classify a decoded JSON value.
///
/// - object with `error` -> `Failure`
/// - object with `nodes` -> `Graph`
/// - anything else -> `MalformedPayload`
pub fn classify_payload(value: Value) -> Result<GenerationPayload, GenomeError> {
    let Value::Object(map) = &value else {
        return Err(GenomeError::MalformedPayload(format!(
            "expected a JSON object, got {}",
            json_type_name(&value)
        )));
    };

    if map.contains_key("error") {
        let failure: GenerationFailure = serde_json::from_value(value)
            .map_err(|e| GenomeError::MalformedPayload(format!("invalid error payload: {e}")))?;
        return Ok(GenerationPayload::Failure(failure));
    }

    if map.contains_key("nodes") {
        let description: GraphDescription = serde_json::from_value(value)
            .map_err(|e| GenomeError::MalformedPayload(format!("invalid graph payload: {e}")))?;
        return Ok(GenerationPayload::Graph(description));
    }

    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    Err(GenomeError::MalformedPayload(format!(
        "expected a 'nodes' or 'error' key, found [{}]",
        keys.join(", ")
    )))
}

/// Parse raw model output into a payload.
///
/// Surrounding code fences are stripped first. Text that is not JSON at all
/// is treated as an upstream failure with the original text preserved.
pub fn parse_generation_text(text: &str) -> Result<GenerationPayload, GenomeError> {
    let cleaned = strip_code_fences(text);
    let value: Value = serde_json::from_str(cleaned).map_err(|e| {
        warn!(error = %e, "generation output is not valid JSON");
        GenomeError::UpstreamGeneration {
            error: format!("failed to parse JSON: {e}"),
            raw: Some(text.to_string()),
        }
    })?;
    classify_payload(value)
}

/// Remove a leading ```` ```json ```` / ```` ``` ```` fence and a trailing
/// ```` ``` ```` fence, then trim whitespace.
pub fn strip_code_fences(text: &str) -> &str {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix("```json") {
        s = rest;
    } else if let Some(rest) = s.strip_prefix("```") {
        s = rest;
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

/// JSON Schema for `GraphDescription`, with `additionalProperties: false`
/// on every object, for use as a structured-output contract.
pub fn graph_description_schema() -> Value {
    let schema = schemars::schema_for!(GraphDescription);
    let mut value = serde_json::to_value(schema).unwrap_or(Value::Null);
    deny_additional_properties(&mut value);
    value
}

fn deny_additional_properties(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.get("type").and_then(Value::as_str) == Some("object") {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
            }
            for child in map.values_mut() {
                deny_additional_properties(child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(deny_additional_properties),
        _ => {}
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
