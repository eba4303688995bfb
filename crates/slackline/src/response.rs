//! Success-flag handling shared by every API method.
//!
//! Every Slack Web API response is a JSON object with an `ok` flag and, on
//! failure, an `error` code. [`check_ok`] enforces the flag before the rest
//! of the body is decoded into a method-specific type.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};
use crate::message::Timestamp;

/// Decodes `body`, fails with [`Error::RemoteApi`] if the `ok` flag is not
/// set, then decodes the body as `T`.
///
/// `failure` is the message carried by the remote API error.
///
/// # Errors
///
/// Returns [`Error::Decode`] for malformed JSON or a body that does not match
/// `T`, and [`Error::RemoteApi`] when the API reports failure.
pub(crate) fn check_ok<T: DeserializeOwned>(body: &[u8], failure: &str) -> Result<T> {
    let value: Value = serde_json::from_slice(body)?;

    if !value.get("ok").is_some_and(is_truthy) {
        let code = value
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_owned);
        warn!(code = code.as_deref().unwrap_or("none"), "{failure}");
        return Err(Error::remote_api(failure, code));
    }

    Ok(serde_json::from_value(value)?)
}

/// Loose truthiness: `null`, `false`, `0`, `""`, `"0"` and `[]` are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// Body of a successful `chat.postMessage` call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostedMessage {
    /// Channel the message was posted to.
    pub channel: String,
    /// Timestamp of the new message. Use it to reply in a thread or edit.
    pub ts: Timestamp,
}
