//! Storage trait and error types.
//!
//! Provides the core [`DocStorage`] trait for abstracting document retrieval,
//! along with [`StorageError`] for unified error handling across backends.
//!
//! # Path Convention
//!
//! All path parameters are absolute (or site-relative) file paths as produced
//! by the plugin options. `DocFile::source` values are relative to the docs
//! directory passed to [`DocStorage::doc_files`] and always `/`-separated.

use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::doc_file::DocFile;

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Invalid path or include pattern.
    InvalidPath,
    /// Backend is temporarily unavailable.
    Unavailable,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // [Mock] Invalid path: <source> (path: /site/docs)
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        f.write_str(match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::Unavailable => "Unavailable",
        })?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Compile include glob patterns.
///
/// Backends use this to filter document files the same way.
///
/// # Errors
///
/// Returns [`StorageErrorKind::InvalidPath`] for the first invalid pattern.
pub fn compile_include_patterns(include: &[String]) -> Result<Vec<Pattern>, StorageError> {
    include
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| {
                StorageError::new(StorageErrorKind::InvalidPath)
                    .with_path(p)
                    .with_source(e)
            })
        })
        .collect()
}

/// Source of document files and sidebar definitions.
///
/// Implementations handle backend-specific details like directory walking,
/// VCS lookups for [`LastUpdateData`](crate::LastUpdateData), and caching.
pub trait DocStorage: Send + Sync {
    /// Return all documents of one docs directory matching `include`.
    ///
    /// Documents are returned ordered by `source`.
    ///
    /// # Arguments
    ///
    /// * `docs_dir` - Directory holding one version's documents
    /// * `include` - Glob patterns relative to `docs_dir`
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the directory can't be listed or a pattern
    /// is invalid.
    fn doc_files(&self, docs_dir: &Path, include: &[String]) -> Result<Vec<DocFile>, StorageError>;

    /// Read a whole file (sidebar definitions, `versions.json`).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file doesn't exist or can't be read.
    fn read(&self, path: &Path) -> Result<String, StorageError>;

    /// Check if a file exists.
    ///
    /// Returns `false` on errors (treats errors as "doesn't exist").
    fn exists(&self, path: &Path) -> bool;
}
