//! Text encodings for list and JSON properties.

use serde_json::Value;

const LIST_SEPARATOR: char = '|';

/// Stand-in for `"` in the invocation parameter backend.
const QUOTE_ESCAPE: &str = "''";

/// Join list entries into a single text value.
///
/// An empty list has no text form and encodes to `None`, since `""` already
/// decodes to a list holding one empty entry.
pub fn encode_string_list(entries: &[String]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }
    Some(entries.join(&LIST_SEPARATOR.to_string()))
}

pub fn decode_string_list(text: &str) -> Vec<String> {
    text.split(LIST_SEPARATOR).map(str::to_string).collect()
}

pub fn encode_json(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

pub fn decode_json(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(text)
}

/// Error raised when JSON text cannot be prepared for the parameter backend.
#[derive(Debug, thiserror::Error)]
pub enum ParameterJsonError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("serialized JSON cannot be escaped reversibly with the quote escape sequence ''")]
    EscapeCollision,
}

/// Serialize JSON for the parameter backend, replacing every `"` with `''`.
///
/// The transform cannot be reversed when a `'` in the serialized text sits
/// next to a quote or another `'`. Any payload whose escaped form does not
/// decode back to the same value is rejected.
pub fn encode_json_for_parameters(value: &Value) -> Result<String, ParameterJsonError> {
    let text = encode_json(value)?;
    if text.contains(QUOTE_ESCAPE) {
        return Err(ParameterJsonError::EscapeCollision);
    }
    let escaped = text.replace('"', QUOTE_ESCAPE);
    match decode_json_from_parameters(&escaped) {
        Ok(decoded) if decoded == *value => Ok(escaped),
        _ => Err(ParameterJsonError::EscapeCollision),
    }
}

pub fn decode_json_from_parameters(text: &str) -> Result<Value, serde_json::Error> {
    decode_json(&text.replace(QUOTE_ESCAPE, "\""))
}
