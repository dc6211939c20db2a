//! Error type for loading versioned docs.

use std::path::PathBuf;

use vd_config::ConfigError;
use vd_sidebars::SidebarError;
use vd_storage::StorageError;

/// Error returned when docs content cannot be loaded.
///
/// Every variant fails the whole load: a broken sidebar or duplicate route
/// is a user-visible defect.
#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    /// Plugin options are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// `versions.json` is not a JSON array of strings.
    #[error("Invalid versions file {}: {source}", path.display())]
    VersionsFile {
        /// Path of the versions file.
        path: PathBuf,
        /// Parse error.
        #[source]
        source: serde_json::Error,
    },
    /// Sidebar definition of a version is invalid.
    #[error("Invalid sidebars for version {version}: {source}")]
    Sidebar {
        /// Version name.
        version: String,
        /// Underlying sidebar error.
        #[source]
        source: SidebarError,
    },
    /// Front matter is not valid YAML.
    #[error("Invalid front matter in {source_path}: {message}")]
    FrontMatter {
        /// Doc source path.
        source_path: String,
        /// Parse error message.
        message: String,
    },
    /// Front matter id contains a path separator.
    #[error("Document id \"{id}\" in {source_path} cannot include \"/\"")]
    InvalidId {
        /// Doc source path.
        source_path: String,
        /// Offending id.
        id: String,
    },
    /// A sidebar item references a document that doesn't exist.
    #[error("Sidebar {sidebar} of version {version} references unknown document id {id}")]
    Resolution {
        /// Version name.
        version: String,
        /// Sidebar id.
        sidebar: String,
        /// Unresolved id.
        id: String,
    },
    /// Two documents resolve to the same id.
    #[error("Duplicate document id {id} in version {version}: {first} and {second}")]
    DuplicateId {
        /// Version name.
        version: String,
        /// Duplicated id.
        id: String,
        /// Source of the first document.
        first: String,
        /// Source of the second document.
        second: String,
    },
    /// Two documents of one version resolve to the same permalink.
    #[error("Duplicate permalink {permalink} in version {version}: {first} and {second}")]
    DuplicatePermalink {
        /// Version name.
        version: String,
        /// Duplicated permalink.
        permalink: String,
        /// Source of the first document.
        first: String,
        /// Source of the second document.
        second: String,
    },
    /// Version set is inconsistent (no last version, several, invalid names).
    #[error("Version integrity error: {0}")]
    VersionIntegrity(String),
    /// A version has no documents.
    #[error("Docs version {0} has no docs")]
    EmptyVersion(String),
}

impl DocsError {
    /// Attach the version name to a sidebar error.
    pub(crate) fn sidebar(version: &str, err: SidebarError) -> Self {
        match err {
            SidebarError::UnknownDoc { sidebar, id } => Self::Resolution {
                version: version.to_owned(),
                sidebar,
                id,
            },
            source => Self::Sidebar {
                version: version.to_owned(),
                source,
            },
        }
    }
}
