//! Local cache of the board's label names.
//!
//! Labels are applied by id, but the generator produces names. The name → id
//! table is synced from the board on demand (`cardrelay sync-labels`) and
//! stored as a flat JSON object so it can be edited by hand.

use std::collections::BTreeMap;
use std::path::Path;

use relay::{BoardLabel, LabelId, LabelName};

use crate::errors::TrelloError;

/// Default location of the label table.
pub const DEFAULT_LABEL_MAP_PATH: &str = "label_map.json";

/// Label name → label id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap {
    by_name: BTreeMap<String, LabelId>,
}

impl LabelMap {
    /// Builds the table from board labels, dropping colour-only labels.
    pub fn from_labels(labels: impl IntoIterator<Item = BoardLabel>) -> Self {
        let by_name = labels
            .into_iter()
            .filter(|label| !label.name.is_empty())
            .map(|label| (label.name, label.id))
            .collect();
        Self { by_name }
    }

    /// Loads the table from `path`.
    ///
    /// A missing file yields an empty table; labels are then skipped until
    /// the table is synced.
    pub fn load(path: &Path) -> Result<Self, TrelloError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    path = %path.display(),
                    "Label map not found; run `cardrelay sync-labels` first"
                );
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(TrelloError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let by_name = serde_json::from_str(&text).map_err(|source| TrelloError::Format {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { by_name })
    }

    /// Writes the table to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), TrelloError> {
        let json = serde_json::to_string_pretty(&self.by_name).map_err(|source| {
            TrelloError::Format {
                path: path.to_path_buf(),
                source,
            }
        })?;
        std::fs::write(path, json).map_err(|source| TrelloError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Looks up the id for a label name. Names match exactly.
    pub fn get(&self, name: &LabelName) -> Option<&LabelId> {
        self.by_name.get(name.as_str())
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
