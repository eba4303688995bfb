//! Channel history records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Format used for [`Message::formatted_time`].
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A timestamp token exactly as the API sent it.
///
/// History responses may carry `ts` as a JSON number or as a string such as
/// `"1700000000.000100"`. The token is written back in the same form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimestampToken {
    /// Numeric token.
    Number(serde_json::Number),
    /// String token.
    Text(String),
}

impl fmt::Display for TimestampToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Message timestamp in epoch seconds, keeping the original token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TimestampToken", into = "TimestampToken")]
pub struct Timestamp {
    token: TimestampToken,
    utc: DateTime<Utc>,
}

impl Timestamp {
    /// Returns the token as received.
    #[must_use]
    pub const fn token(&self) -> &TimestampToken {
        &self.token
    }

    /// Whole epoch seconds. Fractional digits are dropped.
    #[must_use]
    pub fn seconds(&self) -> i64 {
        self.utc.timestamp()
    }

    /// Returns the timestamp as a UTC date-time.
    #[must_use]
    pub const fn to_utc(&self) -> DateTime<Utc> {
        self.utc
    }

    /// Returns the timestamp in the local time zone.
    #[must_use]
    pub fn to_local(&self) -> DateTime<Local> {
        self.utc.with_timezone(&Local)
    }

    /// Formats the timestamp as local `YYYY-MM-DD HH:MM:SS`.
    #[must_use]
    pub fn format_local(&self) -> String {
        self.to_local().format(TIME_FORMAT).to_string()
    }
}

impl TryFrom<TimestampToken> for Timestamp {
    type Error = DecodeError;

    fn try_from(token: TimestampToken) -> Result<Self, Self::Error> {
        let utc = match &token {
            TimestampToken::Number(n) => number_seconds(n),
            TimestampToken::Text(s) => text_seconds(s),
        }
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| invalid_ts(&token))?;

        Ok(Self { token, utc })
    }
}

impl From<Timestamp> for TimestampToken {
    fn from(ts: Timestamp) -> Self {
        ts.token
    }
}

impl FromStr for Timestamp {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(TimestampToken::Text(s.to_string()))
    }
}

impl TryFrom<i64> for Timestamp {
    type Error = DecodeError;

    fn try_from(seconds: i64) -> Result<Self, Self::Error> {
        Self::try_from(TimestampToken::Number(seconds.into()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.token, f)
    }
}

fn invalid_ts(token: &TimestampToken) -> DecodeError {
    DecodeError::InvalidField {
        field: "ts",
        reason: format!("`{token}` is not an epoch-seconds value"),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn number_seconds(n: &serde_json::Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.is_finite() && f.abs() < 9.0e15)
            .map(|f| f.trunc() as i64)
    })
}

fn text_seconds(s: &str) -> Option<i64> {
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    if !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    whole.parse().ok()
}

/// A single history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    user: String,
    text: String,
    timestamp: Timestamp,
    formatted_time: String,
}

impl Message {
    pub(crate) fn new(user: String, text: String, timestamp: Timestamp) -> Self {
        let formatted_time = timestamp.format_local();
        Self {
            user,
            text,
            timestamp,
            formatted_time,
        }
    }

    /// Author's user ID.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Raw message text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Timestamp as sent by the API.
    #[must_use]
    pub const fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    /// Local time of the message, `YYYY-MM-DD HH:MM:SS`.
    #[must_use]
    pub fn formatted_time(&self) -> &str {
        &self.formatted_time
    }

    /// Mention markup for the author, e.g. `<@U024BE7LH>`.
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<@{}>", self.user)
    }
}

/// Messages returned by a history fetch, in API order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    messages: Vec<Message>,
}

impl History {
    pub(crate) const fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Returns the messages.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Consumes the history, returning the messages.
    #[must_use]
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if the channel returned no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterates over the messages.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}

impl IntoIterator for History {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
