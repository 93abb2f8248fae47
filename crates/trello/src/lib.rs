//! Card relay Trello adapter.
//!
//! Implements [`relay::RecordStore`] and [`relay::BoardAdmin`] over the
//! Trello REST API ([`TrelloClient`]) and over local JSON files
//! ([`MockBoard`], for `MOCK_TRELLO=true`).
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Authentication query parameters, Trello field names,
//! comment pagination, and the label name → id cache all live here. The
//! `processor` crate sees only the port traits.

mod client;
mod errors;
mod labels;
mod mock;
mod wire;

pub use client::{TrelloClient, TrelloConfig, TRELLO_API_BASE};
pub use errors::TrelloError;
pub use labels::{LabelMap, DEFAULT_LABEL_MAP_PATH};
pub use mock::{MockBoard, MockWrite, DEFAULT_MOCK_DATA_DIR, MOCK_RECORDS};
