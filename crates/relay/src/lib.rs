//! Core domain for the card relay.
//!
//! This crate contains every domain concept, newtype identifier, text rule,
//! and error type used by the relay, plus the port traits that the
//! infrastructure crates implement. It defines *what* is needed; the `trello`,
//! `llm`, `slack`, and `listener` crates define *how* to supply it.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`RecordId`, `LabelName`, `EventId`, etc.) |
//! | [`types`] | Board value types (`Record`, `BoardList`, `Webhook`, `Timestamp`) |
//! | [`event`] | `QueuedEvent` and the recognised `EventType`s |
//! | [`context`] | `[Context]` block parsing and label derivation |
//! | [`comment`] | Reply marker, reply signing, comment pagination |
//! | [`errors`] | Processing and component error types |
//! | [`ports`] | Traits implemented by infrastructure adapters |

pub mod comment;
pub mod context;
pub mod errors;
pub mod event;
pub mod identifiers;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use comment::{
    is_own_reply, paginate_comment, sign_reply, DEFAULT_COMMENT_LIMIT, REPLY_MARKER,
};
pub use context::{
    labels_from_context, split_context, strip_context_header, with_context, SplitDescription,
    CONTEXT_HEADER,
};
pub use errors::{LlmError, RecordStoreError, RelayError};
pub use event::{EventType, QueuedEvent};
pub use identifiers::{BoardId, EventId, LabelId, LabelName, ListId, ModelName, RecordId, WebhookId};
pub use ports::{BoardAdmin, EventProcessor, LlmProvider, RecordStore, StatusReporter};
pub use types::{BoardLabel, BoardList, Record, Timestamp, Webhook};
