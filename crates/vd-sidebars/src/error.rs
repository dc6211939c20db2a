//! Sidebar error types.

/// Error returned when a sidebar definition is invalid.
#[derive(Debug, thiserror::Error)]
pub enum SidebarError {
    /// Sidebar file is not valid JSON or not an object.
    #[error("Invalid sidebar file: {0}")]
    Parse(#[from] serde_json::Error),
    /// Item has the wrong shape.
    #[error("Invalid sidebar item {item}: {reason}")]
    InvalidItem {
        /// Offending item, serialized as JSON.
        item: String,
        /// What is wrong with it.
        reason: String,
    },
    /// Item has an unknown `type` value.
    #[error("Unknown sidebar item type [{0}]")]
    UnknownType(String),
    /// A doc or ref item points to a document that doesn't exist.
    #[error("Sidebar {sidebar} references unknown document id {id}")]
    UnknownDoc {
        /// Sidebar containing the reference.
        sidebar: String,
        /// Unresolved id.
        id: String,
    },
}

impl SidebarError {
    pub(crate) fn invalid(item: &serde_json::Value, reason: impl Into<String>) -> Self {
        Self::InvalidItem {
            item: item.to_string(),
            reason: reason.into(),
        }
    }
}
