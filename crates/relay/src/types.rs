//! Shared value types for the card relay domain.
//!
//! These are provider-neutral snapshots of board objects. Infrastructure
//! adapters translate their wire formats into these types; nothing here knows
//! about a particular board API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{LabelId, ListId, RecordId, WebhookId};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A task record (card) as fetched from the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Board-assigned identifier.
    pub id: RecordId,
    /// Card title.
    pub name: String,
    /// Card description (markdown). Empty when the card has none.
    #[serde(default)]
    pub description: String,
    /// Browser URL of the card.
    #[serde(default)]
    pub url: String,
    /// List the card currently sits in, when the provider reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<ListId>,
}

// ---------------------------------------------------------------------------
// Board structure
// ---------------------------------------------------------------------------

/// A list (column) on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardList {
    /// Board-assigned identifier.
    pub id: ListId,
    /// Display name (e.g. `"In Progress"`).
    pub name: String,
}

/// A label definition on the board.
///
/// Labels without a name exist on most boards (colour-only labels); they are
/// represented with an empty `name` and never enter the label table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardLabel {
    /// Board-assigned identifier.
    pub id: LabelId,
    /// Display name; may be empty.
    #[serde(default)]
    pub name: String,
}

/// A webhook subscription registered with the board provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    /// Provider-assigned identifier.
    pub id: WebhookId,
    /// Model (board, list, or card) the subscription watches.
    pub model_id: String,
    /// URL the provider delivers events to.
    pub callback_url: String,
    /// Free-text description supplied at registration.
    #[serde(default)]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly; the underlying representation can change without affecting the
/// domain API. Serialises as an RFC 3339 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
