//! Author-facing document source shapes.

use serde::{Deserialize, Serialize};

/// Last modification provenance of a document.
///
/// Both fields are optional: sources without VCS metadata leave them unset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastUpdateData {
    /// Last update time as seconds since Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<i64>,
    /// Author of the last update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_by: Option<String>,
}

impl LastUpdateData {
    /// Check if no provenance is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.last_updated_at.is_none() && self.last_updated_by.is_none()
    }
}

/// A source document of one version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocFile {
    /// Path relative to the version's docs directory, `/`-separated
    /// (e.g., "guides/setup.md").
    pub source: String,
    /// Raw file content, front matter included.
    pub content: String,
    /// Last modification provenance.
    #[serde(default)]
    pub last_update: LastUpdateData,
}

impl DocFile {
    /// Create a document without update provenance.
    #[must_use]
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
            last_update: LastUpdateData::default(),
        }
    }

    /// Attach update provenance.
    #[must_use]
    pub fn with_last_update(mut self, last_update: LastUpdateData) -> Self {
        self.last_update = last_update;
        self
    }
}
