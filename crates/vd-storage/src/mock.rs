//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::doc_file::{DocFile, LastUpdateData};
use crate::storage::{DocStorage, StorageError, StorageErrorKind, compile_include_patterns};

const BACKEND: &str = "Mock";

#[derive(Debug)]
struct MockFile {
    content: String,
    last_update: LastUpdateData,
}

/// Mock storage for testing.
///
/// Stores files in memory keyed by absolute path. Use the builder methods
/// to configure the mock with test data.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use vd_storage::{DocStorage, MockStorage};
///
/// let storage = MockStorage::new()
///     .with_doc_file("/site/docs/intro.md", "# Intro")
///     .with_file("/site/sidebars.json", r#"{"docs": ["intro"]}"#);
///
/// let docs = storage.doc_files(Path::new("/site/docs"), &["**/*.md".to_owned()]).unwrap();
/// let sidebars = storage.read(Path::new("/site/sidebars.json")).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: BTreeMap<PathBuf, MockFile>,
    unavailable: bool,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plain file (sidebar definition, `versions.json`, ...).
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.with_doc_file_updated(path, content, LastUpdateData::default())
    }

    /// Add a document file without update provenance.
    ///
    /// Equivalent to [`with_file`](Self::with_file); the name documents intent
    /// in test setups.
    #[must_use]
    pub fn with_doc_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.with_file(path, content)
    }

    /// Add a document file with update provenance.
    #[must_use]
    pub fn with_doc_file_updated(
        mut self,
        path: impl Into<PathBuf>,
        content: impl Into<String>,
        last_update: LastUpdateData,
    ) -> Self {
        self.files.insert(
            path.into(),
            MockFile {
                content: content.into(),
                last_update,
            },
        );
        self
    }

    /// Make every operation fail with [`StorageErrorKind::Unavailable`].
    #[must_use]
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    fn check_available(&self, path: &Path) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::new(StorageErrorKind::Unavailable)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(())
    }
}

/// Convert a relative path to a `/`-separated source string.
fn to_source(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

impl DocStorage for MockStorage {
    fn doc_files(&self, docs_dir: &Path, include: &[String]) -> Result<Vec<DocFile>, StorageError> {
        self.check_available(docs_dir)?;
        let patterns =
            compile_include_patterns(include).map_err(|e| e.with_backend(BACKEND))?;

        let files = self
            .files
            .iter()
            .filter_map(|(path, file)| {
                let rel = path.strip_prefix(docs_dir).ok()?;
                let source = to_source(rel);
                patterns
                    .iter()
                    .any(|p| p.matches(&source))
                    .then(|| DocFile {
                        source,
                        content: file.content.clone(),
                        last_update: file.last_update.clone(),
                    })
            })
            .collect::<Vec<_>>();

        tracing::trace!(dir = %docs_dir.display(), count = files.len(), "Listed mock doc files");
        Ok(files)
    }

    fn read(&self, path: &Path) -> Result<String, StorageError> {
        self.check_available(path)?;
        self.files
            .get(path)
            .map(|f| f.content.clone())
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }

    fn exists(&self, path: &Path) -> bool {
        !self.unavailable && self.files.contains_key(path)
    }
}
