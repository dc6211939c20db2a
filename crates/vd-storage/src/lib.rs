//! Document source abstraction for versioned documentation content.
//!
//! This crate provides a [`DocStorage`] trait for abstracting how document files
//! and sidebar definitions are obtained. Walking a filesystem, reading a git
//! tree, or fetching from an object store are left to the implementor; the
//! loader only sees [`DocFile`] values and raw file contents.
//!
//! # Architecture
//!
//! The crate provides:
//! - [`DocFile`] and [`LastUpdateData`], the author-facing source shapes
//! - [`DocStorage`] trait with `doc_files()`, `read()`, and `exists()` methods
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use vd_storage::{DocStorage, MockStorage};
//!
//! let storage = MockStorage::new()
//!     .with_doc_file("/site/docs/intro.md", "# Intro");
//! let files = storage.doc_files(Path::new("/site/docs"), &["**/*.md".to_owned()])?;
//! assert_eq!(files[0].source, "intro.md");
//! ```

mod doc_file;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use doc_file::{DocFile, LastUpdateData};
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{DocStorage, StorageError, StorageErrorKind, compile_include_patterns};
