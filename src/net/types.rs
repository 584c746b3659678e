//! Wire types for `POST /chat`.
//!
//! The request always carries `session_id`, serialized as `null` until the
//! endpoint has issued one. Every reply field is optional and unknown fields
//! are ignored, so older and newer endpoints both parse.

use serde::{Deserialize, Deserializer, Serialize};

use super::client::ExchangeError;

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

// =============================================================================
// REQUEST
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<String>,
}

impl ChatRequest {
    #[must_use]
    pub fn new(message: impl Into<String>, session_id: Option<&str>) -> Self {
        Self { message: message.into(), session_id: session_id.map(str::to_owned) }
    }
}

// =============================================================================
// REPLY
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub session_id: Option<String>,
    /// Display text; may contain the bold/line-break markup subset.
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub choices: Option<Vec<String>>,
    /// Payment or external handoff page. May be relative to the endpoint.
    #[serde(default)]
    pub checkout_url: Option<String>,
    /// Set by the endpoint when the conversation reached its end. Informational
    /// only, so values that are not a boolean read as `false`.
    #[serde(default, deserialize_with = "lenient_flag")]
    pub done: bool,
    /// Opaque structured data attached to the reply (product, totals).
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

impl ChatReply {
    /// Reply text, or `None` when absent or empty.
    #[must_use]
    pub fn reply_text(&self) -> Option<&str> {
        self.reply.as_deref().filter(|text| !text.trim().is_empty())
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        self.choices.as_deref().unwrap_or_default()
    }

    /// Checkout target, or `None` when absent or empty.
    #[must_use]
    pub fn checkout_url(&self) -> Option<&str> {
        self.checkout_url.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }
}

/// Parse a reply body. Anything that is not a JSON object of the expected
/// shape is malformed.
///
/// # Errors
///
/// Returns [`ExchangeError::Malformed`] when the body does not deserialize.
pub fn parse_reply(body: &str) -> Result<ChatReply, ExchangeError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ExchangeError::Malformed(e.to_string()))?;
    if !value.is_object() {
        return Err(ExchangeError::Malformed(format!("expected JSON object, got {}", json_kind(&value))));
    }
    ChatReply::deserialize(value).map_err(|e| ExchangeError::Malformed(e.to_string()))
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(flag) => flag,
        serde_json::Value::String(text) => text.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
