//! Decoding of channel history responses.
//!
//! Expected body:
//!
//! ```text
//! { "ok": true, "messages": [ { "user": "U1", "text": "hi", "ts": 1700000000 } ] }
//! ```

use serde::Deserialize;
use tracing::debug;

use crate::error::{DecodeError, Result};
use crate::message::{History, Message, Timestamp, TimestampToken};
use crate::response::check_ok;

/// Message carried by [`crate::Error::RemoteApi`] when a history fetch fails.
pub const FETCH_FAILED: &str = "failed to fetch messages";

#[derive(Debug, Deserialize)]
struct HistoryBody {
    messages: Option<Vec<RawMessage>>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    user: Option<String>,
    text: Option<String>,
    ts: Option<TimestampToken>,
}

impl TryFrom<RawMessage> for Message {
    type Error = DecodeError;

    fn try_from(raw: RawMessage) -> std::result::Result<Self, Self::Error> {
        let user = raw.user.ok_or(DecodeError::MissingField("user"))?;
        let text = raw.text.ok_or(DecodeError::MissingField("text"))?;
        let ts = raw.ts.ok_or(DecodeError::MissingField("ts"))?;
        Ok(Self::new(user, text, Timestamp::try_from(ts)?))
    }
}

/// Parses a history response body.
///
/// Messages keep the order of the response array.
///
/// # Errors
///
/// Returns [`crate::Error::Decode`] if the body is not JSON or an entry lacks
/// `user`, `text` or a valid `ts`, and [`crate::Error::RemoteApi`] if the `ok`
/// flag is missing or false.
pub fn parse(body: &[u8]) -> Result<History> {
    let body: HistoryBody = check_ok(body, FETCH_FAILED)?;
    let messages = body
        .messages
        .ok_or(DecodeError::MissingField("messages"))?
        .into_iter()
        .map(Message::try_from)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    debug!(count = messages.len(), "Parsed channel history");
    Ok(History::new(messages))
}

/// Reads the body of a history response and parses it.
///
/// # Errors
///
/// Returns [`crate::Error::Transport`] if the body cannot be read, otherwise
/// the same errors as [`parse`].
pub async fn parse_response(response: reqwest::Response) -> Result<History> {
    let body = response.bytes().await?;
    parse(&body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::unreadable_literal)]
mod tests {
    use super::*;
    use crate::Error;

    const ONE_MESSAGE: &[u8] =
        br#"{"ok": true, "messages": [{"user":"U1","text":"hi","ts":1700000000}]}"#;

    #[test]
    fn test_single_message() {
        let history = parse(ONE_MESSAGE).unwrap();

        assert_eq!(history.len(), 1);
        let message = &history.messages()[0];
        assert_eq!(message.user(), "U1");
        assert_eq!(message.text(), "hi");
        assert_eq!(message.timestamp().seconds(), 1700000000);
        assert_eq!(message.timestamp().to_string(), "1700000000");
        assert_eq!(message.formatted_time(), message.timestamp().format_local());
    }

    #[test]
    fn test_not_ok() {
        let err = parse(br#"{"ok": false}"#).unwrap_err();
        match err {
            Error::RemoteApi { message, code } => {
                assert_eq!(message, FETCH_FAILED);
                assert!(code.is_none());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_not_ok_ignores_messages() {
        let body = br#"{"ok": false, "error": "channel_not_found", "messages": [{"user": "U1"}]}"#;
        let err = parse(body).unwrap_err();
        assert_eq!(err.api_code(), Some("channel_not_found"));
    }

    #[test]
    fn test_empty_history() {
        let history = parse(br#"{"ok": true, "messages": []}"#).unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_order_preserved() {
        let history = parse(
            br#"{"ok": true, "messages": [
                {"user": "U3", "text": "c", "ts": "1700000300.000000"},
                {"user": "U1", "text": "a", "ts": "1700000100.000000"},
                {"user": "U2", "text": "b", "ts": "1700000200.000000"}
            ]}"#,
        )
        .unwrap();

        let texts: Vec<_> = history.iter().map(Message::text).collect();
        assert_eq!(texts, ["c", "a", "b"]);
    }

    #[test]
    fn test_extra_fields_ignored() {
        let history = parse(
            br#"{"ok": true, "has_more": true, "messages": [
                {"type": "message", "user": "U1", "text": "hi", "ts": "1.0", "reactions": []}
            ]}"#,
        )
        .unwrap();
        assert_eq!(history.len(), 1);
    }

    fn missing_field(body: &str) -> &'static str {
        match parse(body.as_bytes()).unwrap_err() {
            Error::Decode(DecodeError::MissingField(name)) => name,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_field_named() {
        assert_eq!(
            missing_field(r#"{"ok": true, "messages": [{"text": "hi", "ts": 1}]}"#),
            "user"
        );
        assert_eq!(
            missing_field(r#"{"ok": true, "messages": [{"user": "U1", "ts": 1}]}"#),
            "text"
        );
        assert_eq!(
            missing_field(r#"{"ok": true, "messages": [{"user": "U1", "text": "hi"}]}"#),
            "ts"
        );
        assert_eq!(missing_field(r#"{"ok": true}"#), "messages");
    }

    #[test]
    fn test_invalid_ts() {
        let body = br#"{"ok": true, "messages": [{"user":"U1","text":"hi","ts":"soon"}]}"#;
        let err = parse(body).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode(DecodeError::InvalidField { field: "ts", .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        let err = parse(b"not json").unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::Json(_))));
    }

    #[test]
    fn test_parse_is_repeatable() {
        assert_eq!(parse(ONE_MESSAGE).unwrap(), parse(ONE_MESSAGE).unwrap());
    }
}
