//! Card relay Slack adapter.
//!
//! [`SlackReporter`] implements [`relay::StatusReporter`] on top of Slack's
//! `chat.postMessage`. The log channel receives operational lines prefixed
//! with `[LOG] `; the main channel receives announcements such as the daily
//! summary.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** A status line is best effort. Nothing in this crate
//! returns an error to the queue worker or the jobs that report through it.

mod client;
mod reporter;

pub use client::{SlackClient, SlackError, SLACK_API_BASE};
pub use reporter::{Slack, SlackReporter, LOG_PREFIX};
