//! Error types for Slack API operations.

/// Result type alias for Slack API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Slack client error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP transport error (connection failure, unreadable body, non-2xx status).
    ///
    /// The request URL is stripped because history requests carry the token
    /// in the query string.
    #[error("HTTP error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The API reported failure through its `ok` flag.
    #[error("Slack API error: {message}{}", code_suffix(.code.as_deref()))]
    RemoteApi {
        /// Human-readable description of the failed operation.
        message: String,
        /// Error code returned by the API (e.g., `channel_not_found`).
        code: Option<String>,
    },

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Creates a remote API error from a message and optional API error code.
    #[must_use]
    pub fn remote_api(message: impl Into<String>, code: Option<String>) -> Self {
        Self::RemoteApi {
            message: message.into(),
            code,
        }
    }

    /// Returns true if the API itself reported the failure.
    #[must_use]
    pub const fn is_remote_api(&self) -> bool {
        matches!(self, Self::RemoteApi { .. })
    }

    /// Returns the API error code, if this is a remote API error that carried one.
    #[must_use]
    pub fn api_code(&self) -> Option<&str> {
        match self {
            Self::RemoteApi { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

fn code_suffix(code: Option<&str>) -> String {
    code.map(|c| format!(" ({c})")).unwrap_or_default()
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(DecodeError::Json(err))
    }
}

/// Failures while decoding an API response body.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Body is not valid JSON, or has the wrong shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required field is missing.
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// A field is present but its value is unusable.
    #[error("invalid field `{field}`: {reason}")]
    InvalidField {
        /// Field name.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}
