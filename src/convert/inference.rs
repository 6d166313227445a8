// Response Schema Inference
//
// Derives a parameter list from a single JSON sample (usually a YAPI
// `res_body`). This is a shape heuristic, not a JSON-Schema generator:
//
// - objects emit one body parameter per key, recursing into nested values
// - arrays are described by their FIRST element only
// - null is reported as "string"
// - top-level scalars produce no parameters
//
// Example:
//   Input:  {"code": 200, "data": {"items": [{"id": 1}]}}
//   Output: code:number, data:object { items:array { id:number } }
//
// Used by: convert::params when building endpoint responses

use serde_json::Value;
use crate::models::{ApiBody, ApiParam, BodyKind, FieldType, ParameterLocation};

/// Parse a raw response body and infer its schema.
///
/// Returns `None` when the text is not JSON; callers treat that as "no
/// response schema" rather than an error.
pub fn infer_response(raw: &str) -> Option<(Vec<ApiParam>, ApiBody)> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let schema = infer_params(&value);
    let body = ApiBody {
        kind: BodyKind::Json,
        data_type: guess_data_type(&value).to_string(),
        schema: schema.clone(),
        example: None,
        json_schema: raw.to_string(),
    };
    Some((schema, body))
}

/// Infer body parameters from an already parsed value.
pub fn infer_params(value: &Value) -> Vec<ApiParam> {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(key, val)| {
                let mut param = ApiParam::new(key.as_str(), guess_type(val), ParameterLocation::Body);
                if matches!(val, Value::Object(_) | Value::Array(_)) {
                    param.children = infer_params(val);
                }
                param
            })
            .collect(),
        Value::Array(items) => items.first().map(infer_params).unwrap_or_default(),
        _ => Vec::new(),
    }
}

pub fn guess_type(value: &Value) -> FieldType {
    match value {
        Value::Null => FieldType::String,
        Value::Bool(_) => FieldType::Boolean,
        Value::Number(_) => FieldType::Number,
        Value::Object(_) => FieldType::Object,
        Value::Array(_) => FieldType::Array,
        Value::String(_) => FieldType::String,
    }
}

/// Top-level shape of a body sample.
pub fn guess_data_type(value: &Value) -> &'static str {
    match value {
        Value::Object(_) => "object",
        Value::Array(_) => "array",
        _ => "string",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn top_level_array_uses_first_element() {
        let params = infer_params(&json!([{"a": 1}, {"b": "x"}]));
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "a");
    }

    #[test]
    fn scalars_yield_nothing() {
        assert!(infer_params(&json!(42)).is_empty());
        assert!(infer_params(&json!("text")).is_empty());
        assert!(infer_params(&json!([])).is_empty());
    }

    #[test]
    fn data_type_follows_top_level_shape() {
        assert_eq!(guess_data_type(&json!({})), "object");
        assert_eq!(guess_data_type(&json!([])), "array");
        assert_eq!(guess_data_type(&json!(true)), "string");
    }
}
