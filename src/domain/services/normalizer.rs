#[cfg(test)]
#[path = "normalizer_test.rs"]
mod tests;

use serde_json::Value;

fn assistant_content(messages: &[Value]) -> Option<&str> {
    return messages
        .iter()
        .filter(|message| return message.get("role").and_then(Value::as_str) == Some("assistant"))
        .find_map(|message| return message.get("content").and_then(Value::as_str));
}

fn pretty(data: &Value) -> String {
    return serde_json::to_string_pretty(data).unwrap_or_else(|_| return data.to_string());
}

/// Reduces an agent response body to the text shown in the transcript.
///
/// A message list wins over a flat `content` field; the first assistant
/// entry with string content is used. Anything else structured is shown as
/// indented JSON, and scalars are shown as-is.
pub fn normalize(data: &Value) -> String {
    match data {
        Value::Object(object) => {
            if let Some(Value::Array(messages)) = object.get("messages") {
                if let Some(content) = assistant_content(messages) {
                    return content.to_string();
                }
            }

            if let Some(Value::String(content)) = object.get("content") {
                return content.to_string();
            }

            return pretty(data);
        }
        Value::Array(_) => return pretty(data),
        Value::String(text) => return text.to_string(),
        _ => return data.to_string(),
    }
}

/// Parses a raw response body, keeping it as plain text when it isn't JSON.
pub fn parse_body(body: &str) -> Value {
    return serde_json::from_str::<Value>(body)
        .unwrap_or_else(|_| return Value::String(body.to_string()));
}
