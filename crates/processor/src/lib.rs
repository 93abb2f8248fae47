//! Card relay orchestration.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`card`] | [`CardProcessor`], the [`relay::EventProcessor`] run by the queue worker |
//! | [`generator`] | [`MetadataGenerator`]: prompts in, card text out |
//! | [`prompts`] | Prompt templates and the default project context |
//! | [`summary`] | The daily in-progress summary job |
//! | [`compare`] | The model comparison job |
//!
//! ## Architectural Layer
//!
//! **Orchestration.** Everything here is written against the port traits in
//! [`relay`]; no HTTP client or file format for a board, model, or chat
//! service is known to this crate.

pub mod card;
pub mod compare;
pub mod generator;
pub mod prompts;
pub mod summary;

pub use card::CardProcessor;
pub use compare::{
    compare_models, render_report, report_file_name, write_report, ModelReply,
    DEFAULT_COMPARISON_MODELS, DEFAULT_REPORT_DIR,
};
pub use generator::MetadataGenerator;
pub use prompts::{DEFAULT_COMPARISON_PROMPT, PROJECT_CONTEXT};
pub use summary::{daily_summary, find_in_progress_list, IN_PROGRESS_NAMES, NOTHING_IN_PROGRESS};
