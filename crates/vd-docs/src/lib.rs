//! Versioned documentation content loading.
//!
//! This crate turns a documentation site into the data a static site
//! generator needs to render it:
//! - [`resolve_versions`]: the working copy and the released versions from `versions.json`
//! - [`load_content`]: per-version doc metadata, sidebars, and navigation
//! - [`GlobalPluginData`]: the client router's view of the content
//! - [`PropVersionMetadata`]: renderable sidebars for the doc page layout
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use vd_config::Config;
//! use vd_docs::{GlobalPluginData, load_content};
//! use vd_storage::MockStorage;
//!
//! let config = Config::for_site(Path::new("/site"));
//! let storage = MockStorage::new().with_doc_file("/site/docs/intro.md", "# Intro");
//!
//! let content = load_content(&config, &storage)?;
//! let global = GlobalPluginData::from_content(&content, &config);
//! assert_eq!(global.versions[0].main_doc_id, "intro");
//! ```

mod error;
mod front_matter;
mod global_data;
mod loader;
mod metadata;
mod props;
mod url;
mod version;

pub use error::DocsError;
pub use front_matter::{FrontMatter, parse_front_matter};
pub use global_data::{GlobalDoc, GlobalPluginData, GlobalVersion};
pub use loader::{LoadedContent, LoadedVersion, load_content, load_version};
pub use metadata::{DocMetadata, DocNavLink, EditUrl, excerpt, first_heading, process_doc_metadata};
pub use props::{PropSidebarItem, PropSidebars, PropVersionMetadata, to_sidebars_prop};
pub use version::{
    CURRENT_VERSION_NAME, LAST_VERSION_ROUTE_PRIORITY, VERSIONS_FILENAME, VersionMetadata,
    qualified_doc_id, read_version_names, resolve_versions, route_base_url, sort_for_routes,
};
