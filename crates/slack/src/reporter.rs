//! Status lines and announcements over Slack, with `tracing` as the fallback.

use async_trait::async_trait;
use relay::StatusReporter;

use crate::client::{SlackClient, SlackError};

/// Prefix applied to every log-channel line.
pub const LOG_PREFIX: &str = "[LOG] ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    /// Operational log lines, prefixed with [`LOG_PREFIX`].
    Log,
    /// Human-facing announcements (daily summaries).
    Main,
}

/// Posts lines to one Slack channel.
///
/// Never fails: when Slack is not configured or the post is rejected, the
/// line is emitted through `tracing` instead.
#[derive(Debug, Clone)]
pub struct SlackReporter {
    client: Option<SlackClient>,
    channel: Option<String>,
    role: Role,
}

impl SlackReporter {
    /// Reporter for the log channel.
    pub fn log_channel(client: Option<SlackClient>, channel: Option<String>) -> Self {
        Self::new(client, channel, Role::Log)
    }

    /// Reporter for the main channel.
    pub fn main_channel(client: Option<SlackClient>, channel: Option<String>) -> Self {
        Self::new(client, channel, Role::Main)
    }

    fn new(client: Option<SlackClient>, channel: Option<String>, role: Role) -> Self {
        Self {
            client,
            channel: channel.filter(|c| !c.is_empty()),
            role,
        }
    }

    async fn deliver(&self, line: &str) -> Result<(), SlackError> {
        let client = self
            .client
            .as_ref()
            .ok_or(SlackError::NotConfigured("SLACK_BOT_TOKEN is not set"))?;
        let channel = self
            .channel
            .as_deref()
            .ok_or(SlackError::NotConfigured("channel is not set"))?;
        match self.role {
            Role::Log => client.post_message(channel, &format!("{LOG_PREFIX}{line}")).await,
            Role::Main => client.post_message(channel, line).await,
        }
    }
}

#[async_trait]
impl StatusReporter for SlackReporter {
    async fn log(&self, line: &str) {
        let Err(err) = self.deliver(line).await else {
            return;
        };
        match (self.role, &err) {
            (Role::Log, SlackError::NotConfigured(_)) => {
                tracing::info!(target: "cardrelay::status", "{line}");
            }
            (Role::Log, _) => {
                tracing::warn!(target: "cardrelay::status", error = %err, "{line}");
            }
            (Role::Main, _) => {
                tracing::error!(error = %err, text = line, "Failed to post to main channel");
            }
        }
    }
}

/// Both channels, built from the same client.
#[derive(Debug, Clone)]
pub struct Slack {
    pub log: SlackReporter,
    pub main: SlackReporter,
}

impl Slack {
    pub fn new(
        client: Option<SlackClient>,
        log_channel: Option<String>,
        main_channel: Option<String>,
    ) -> Self {
        Self {
            log: SlackReporter::log_channel(client.clone(), log_channel),
            main: SlackReporter::main_channel(client, main_channel),
        }
    }

    /// Posts an announcement to the main channel. Failures are logged.
    pub async fn post_to_main(&self, message: &str) {
        self.main.log(message).await;
    }

    /// Posts a status line to the log channel. Failures fall back to `tracing`.
    pub async fn log_to_slack(&self, line: &str) {
        self.log.log(line).await;
    }
}
