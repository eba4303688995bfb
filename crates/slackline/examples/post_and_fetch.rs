//! Example: post a report to a channel and read back its latest messages.
//!
//! ## Prerequisites
//!
//! A user token (`xoxp-...`) with `chat:write` and `groups:history` scopes,
//! and the ID of a private channel the user belongs to.
//!
//! ```bash
//! export SLACK_TOKEN="xoxp-..."
//! export SLACK_CHANNEL="G0123456"
//! ```
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=slackline=debug cargo run --example post_and_fetch
//! ```

use std::env;

use anyhow::Context;
use slackline::{Attachments, COLOR_WARNING, SlackClient};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slackline=debug,post_and_fetch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let token = env::var("SLACK_TOKEN").context("SLACK_TOKEN environment variable not set")?;
    let channel =
        env::var("SLACK_CHANNEL").context("SLACK_CHANNEL environment variable not set")?;

    let client = SlackClient::new(token)?;

    let attachments = Attachments::new()
        .add_attachment("Build", "All tests passed", None)
        .add_attachment("Coverage", "Dropped below 80%", Some(COLOR_WARNING));

    let posted = client
        .send_message_checked(&channel, "Nightly report", Some(&attachments))
        .await?;
    info!(channel = %posted.channel, ts = %posted.ts, "Message posted");

    let history = client.fetch_history(&channel).await?;
    println!("Latest {} message(s) in {channel}:", history.len());
    for message in &history {
        println!(
            "  [{}] {}: {}",
            message.formatted_time(),
            message.mention(),
            message.text()
        );
    }

    Ok(())
}
