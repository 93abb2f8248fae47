//! `[Context]` metadata blocks embedded in card descriptions.
//!
//! A description that has already been enriched starts (or contains) a block
//! of the form:
//!
//! ```text
//! [Context]
//! GameSystem: Settlement Mode
//! Mode: Dungeon
//! Subsystem: Loot
//!
//! The rest of the description...
//! ```
//!
//! The block runs from the `[Context]` header to the first blank line (or the
//! end of the text). Its `Key: value` lines double as label names.

use std::sync::LazyLock;

use regex::Regex;

use crate::LabelName;

/// Header that opens a metadata block.
pub const CONTEXT_HEADER: &str = "[Context]";

static CONTEXT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\[Context\](.*?)(\n\n|\z)").expect("context block regex is valid")
});

/// A description split into its metadata block and the remaining text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitDescription {
    /// Body of the `[Context]` block, trimmed. `None` if the description has
    /// no block.
    pub context: Option<String>,
    /// Description with the block removed, trimmed.
    pub cleaned: String,
}

/// Separates an existing `[Context]` block from the rest of a description.
///
/// When no block is present the description is returned unchanged (not
/// trimmed) as `cleaned`.
pub fn split_context(description: &str) -> SplitDescription {
    match CONTEXT_BLOCK.captures(description) {
        Some(caps) => {
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            let body = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
            let mut cleaned = String::with_capacity(description.len());
            cleaned.push_str(&description[..whole.start]);
            cleaned.push_str(&description[whole.end..]);
            SplitDescription {
                context: Some(body),
                cleaned: cleaned.trim().to_string(),
            }
        }
        None => SplitDescription {
            context: None,
            cleaned: description.to_string(),
        },
    }
}

/// Removes a leading `[Context]` header from model output.
///
/// Models asked to answer "in the format `[Context] ...`" usually echo the
/// header; it is added back exactly once when the description is rebuilt.
pub fn strip_context_header(generated: &str) -> &str {
    let trimmed = generated.trim();
    trimmed
        .strip_prefix(CONTEXT_HEADER)
        .map_or(trimmed, str::trim_start)
}

/// Rebuilds a description with `context` as its leading metadata block.
pub fn with_context(context: &str, cleaned: &str) -> String {
    format!("{CONTEXT_HEADER}\n{context}\n\n{cleaned}")
}

/// Derives label names from the `Key: value` lines of a metadata block.
///
/// Values may list several labels separated by `/`. Values equal to `none`
/// (any case) and empty fragments are skipped. Lines without a colon are
/// ignored.
pub fn labels_from_context(context: &str) -> Vec<LabelName> {
    context
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(_, value)| value.trim())
        .filter(|value| !value.eq_ignore_ascii_case("none"))
        .flat_map(|value| value.split('/'))
        .filter_map(|label| LabelName::new(label.trim()))
        .collect()
}
