//! Request body encoding.
//!
//! # Design
//! Form bodies go through JSON first: the value is serialized with
//! `serde_json`, then the top-level object's fields become form pairs. Only
//! flat objects survive that trip. Nested objects and arrays are rejected
//! rather than stringified, and `null` fields are left out.

use serde::Serialize;
use serde_json::Value;

use crate::error::RequestError;
use crate::types::ContentType;

/// Encode `body` for the given content type.
pub fn encode_body<B: Serialize + ?Sized>(
    body: &B,
    content_type: ContentType,
) -> Result<Vec<u8>, RequestError> {
    match content_type {
        ContentType::Json => serde_json::to_vec(body).map_err(RequestError::EncodeJson),
        ContentType::Form => encode_form(body).map(String::into_bytes),
    }
}

/// Encode a flat serializable value as `application/x-www-form-urlencoded`.
pub fn encode_form<B: Serialize + ?Sized>(body: &B) -> Result<String, RequestError> {
    let value =
        serde_json::to_value(body).map_err(|e| RequestError::EncodeForm(e.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(RequestError::EncodeForm(format!(
            "expected a JSON object, got {}",
            kind(&value)
        )));
    };

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in &fields {
        let text = match value {
            Value::Null => continue,
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(RequestError::EncodeForm(format!(
                    "field `{key}` is {}, not a scalar",
                    kind(value)
                )));
            }
        };
        serializer.append_pair(key, &text);
    }
    Ok(serializer.finish())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
