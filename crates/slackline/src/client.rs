//! Slack Web API client.

use std::sync::Arc;

use reqwest::{Request, Response};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::attachment::Attachments;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::history;
use crate::message::History;
use crate::response::{PostedMessage, check_ok};

/// Method path for posting a message.
pub const POST_MESSAGE: &str = "chat.postMessage";

/// Method path for reading private channel history.
pub const HISTORY: &str = "groups.history";

/// Number of messages requested by [`SlackClient::fetch_history`].
pub const HISTORY_PAGE_SIZE: u32 = 2;

/// Message carried by [`Error::RemoteApi`] when a checked send fails.
pub const POST_FAILED: &str = "failed to post message";

/// Slack Web API client bound to one access token.
///
/// Cloning is cheap and clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct SlackClient {
    inner: Arc<SlackClientInner>,
}

#[derive(Debug)]
struct SlackClientInner {
    http: reqwest::Client,
    base_url: Url,
    token: SecretString,
}

impl SlackClient {
    /// Creates a client for `https://slack.com/api/` with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or the HTTP client fails to build.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_config(token, ClientConfig::new()?)
    }

    /// Creates a client with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or the HTTP client fails to build.
    pub fn with_config(token: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::InvalidConfig("access token is empty".into()));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;

        Ok(Self {
            inner: Arc::new(SlackClientInner {
                http,
                base_url: config.base_url,
                token: SecretString::from(token),
            }),
        })
    }

    /// Returns the API base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Posts `text` to a channel as the token's user.
    ///
    /// The response is returned as-is: the API reports most failures with
    /// HTTP 200 and `"ok": false`, so callers that need to know whether the
    /// message landed should use [`Self::send_message_checked`] or inspect
    /// the body themselves.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the request cannot be sent.
    pub async fn send_message(
        &self,
        channel: &str,
        text: &str,
        attachments: Option<&Attachments>,
    ) -> Result<Response> {
        let request = self.post_message_request(channel, text, attachments)?;
        debug!(
            channel,
            attachments = attachments.map_or(0, Attachments::len),
            "Posting message"
        );
        Ok(self.inner.http.execute(request).await?)
    }

    /// Posts a message and checks the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] on network failure or a non-2xx status,
    /// [`Error::Decode`] if the body is not the expected JSON, and
    /// [`Error::RemoteApi`] if the API reports failure.
    pub async fn send_message_checked(
        &self,
        channel: &str,
        text: &str,
        attachments: Option<&Attachments>,
    ) -> Result<PostedMessage> {
        let response = self
            .send_message(channel, text, attachments)
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;
        check_ok(&body, POST_FAILED)
    }

    /// Fetches the most recent [`HISTORY_PAGE_SIZE`] messages of a channel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] on network failure or a non-2xx status,
    /// [`Error::Decode`] if the body is malformed, and [`Error::RemoteApi`]
    /// if the API reports failure.
    pub async fn fetch_history(&self, channel: &str) -> Result<History> {
        let request = self.history_request(channel)?;
        debug!(
            channel,
            count = HISTORY_PAGE_SIZE,
            "Fetching channel history"
        );
        let response = self
            .inner
            .http
            .execute(request)
            .await?
            .error_for_status()?;
        history::parse_response(response).await
    }

    fn endpoint(&self, method: &str) -> Result<Url> {
        Ok(self.inner.base_url.join(method)?)
    }

    fn post_message_request(
        &self,
        channel: &str,
        text: &str,
        attachments: Option<&Attachments>,
    ) -> Result<Request> {
        let mut form = vec![
            ("token", self.inner.token.expose_secret().to_owned()),
            ("channel", channel.to_owned()),
            ("text", text.to_owned()),
            ("as_user", "true".to_owned()),
        ];

        if let Some(attachments) = attachments.filter(|a| !a.is_empty()) {
            form.push(("attachments", attachments.to_json()?));
        }

        Ok(self
            .inner
            .http
            .post(self.endpoint(POST_MESSAGE)?)
            .form(&form)
            .build()?)
    }

    fn history_request(&self, channel: &str) -> Result<Request> {
        let count = HISTORY_PAGE_SIZE.to_string();
        Ok(self
            .inner
            .http
            .get(self.endpoint(HISTORY)?)
            .query(&[
                ("token", self.inner.token.expose_secret()),
                ("channel", channel),
                ("count", count.as_str()),
            ])
            .build()?)
    }
}
