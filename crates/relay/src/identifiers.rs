//! Newtype domain identifiers.
//!
//! Every board concept that has an identity is represented as a distinct newtype
//! wrapping a primitive. This prevents accidentally interchanging, for example,
//! a [`RecordId`] with a [`LabelId`] even though both are opaque strings under
//! the hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Board-assigned identifiers
// ---------------------------------------------------------------------------

string_id! {
    /// Identifies a card (task record) on the board.
    ///
    /// Opaque to this system; assigned by the board provider.
    RecordId
}

string_id! {
    /// Identifies the board that records, lists, and labels belong to.
    BoardId
}

string_id! {
    /// Identifies a list (column) on the board.
    ListId
}

string_id! {
    /// Identifies a label definition on the board.
    LabelId
}

string_id! {
    /// Identifies a webhook subscription registered with the board provider.
    WebhookId
}

// ---------------------------------------------------------------------------
// Human and configuration names
// ---------------------------------------------------------------------------

string_id! {
    /// A human-readable label name (e.g. `"Combat AI"`).
    ///
    /// Mapped to a [`LabelId`] through the locally cached label table before
    /// being applied to a record.
    LabelName
}

string_id! {
    /// Names a language model as understood by the configured provider
    /// (e.g. `"llama3"`, `"gpt-4o-mini"`).
    ModelName
}

// ---------------------------------------------------------------------------
// UUID-backed identifiers (internally generated)
// ---------------------------------------------------------------------------

/// Identifies one accepted webhook delivery.
///
/// Generated at intake time; propagated through spans and status lines so
/// all activity caused by a single delivery can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    /// Generates a new random event identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an [`EventId`] from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
