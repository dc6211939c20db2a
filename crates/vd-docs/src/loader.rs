//! Version and content loading.
//!
//! [`load_content`] is the plugin's load phase: resolve versions, load each
//! one in parallel, and assemble an immutable [`LoadedContent`].

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use vd_config::Config;
use vd_sidebars::{Sidebars, collect_doc_ids, create_order, parse_sidebars, resolve_doc_ids};
use vd_storage::DocStorage;

use crate::DocsError;
use crate::metadata::{DocMetadata, DocNavLink, process_doc_metadata};
use crate::version::{VersionMetadata, qualified_doc_id, resolve_versions, sort_for_routes};

/// Calculate elapsed time in milliseconds.
fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// One fully loaded version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedVersion {
    #[serde(flatten)]
    pub metadata: VersionMetadata,
    /// Unversioned id of the doc the version entry point links to.
    pub main_doc_id: String,
    /// Docs in source order.
    pub docs: Vec<DocMetadata>,
    /// Sidebars with ids resolved to qualified doc ids.
    pub sidebars: Sidebars,
    /// Sidebar owning each doc permalink.
    pub permalink_to_sidebar: BTreeMap<String, String>,
}

impl LoadedVersion {
    /// Version name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.version_name
    }

    /// Look up a doc by qualified id.
    #[must_use]
    pub fn doc(&self, id: &str) -> Option<&DocMetadata> {
        self.docs.iter().find(|d| d.id == id)
    }

    /// Permalink of every doc by site-aliased source path.
    ///
    /// Used to rewrite relative Markdown links between docs.
    #[must_use]
    pub fn source_to_permalink(&self) -> BTreeMap<String, String> {
        self.docs
            .iter()
            .map(|d| (d.source.clone(), d.permalink.clone()))
            .collect()
    }
}

/// All loaded versions of one plugin instance.
///
/// Constructed through [`LoadedContent::new`], which guarantees exactly one
/// last version and unique version names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedContent {
    loaded_versions: Vec<LoadedVersion>,
    #[serde(skip)]
    last: usize,
}

impl LoadedContent {
    /// Assemble loaded versions, checking version integrity.
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::VersionIntegrity`] if there is not exactly one last
    /// version, if names repeat, or if a main doc id is unknown.
    pub fn new(loaded_versions: Vec<LoadedVersion>) -> Result<Self, DocsError> {
        let mut names = HashSet::new();
        for version in &loaded_versions {
            if !names.insert(version.name()) {
                return Err(DocsError::VersionIntegrity(format!(
                    "version {} is loaded twice",
                    version.name()
                )));
            }
            if !version
                .docs
                .iter()
                .any(|d| d.unversioned_id == version.main_doc_id)
            {
                return Err(DocsError::VersionIntegrity(format!(
                    "main doc {} of version {} does not exist",
                    version.main_doc_id,
                    version.name()
                )));
            }
        }

        let last: Vec<usize> = loaded_versions
            .iter()
            .enumerate()
            .filter(|(_, v)| v.metadata.is_last)
            .map(|(i, _)| i)
            .collect();
        let [last] = last[..] else {
            return Err(DocsError::VersionIntegrity(format!(
                "expected exactly one last version, found {}",
                last.len()
            )));
        };

        Ok(Self {
            loaded_versions,
            last,
        })
    }

    /// Versions in declaration order.
    #[must_use]
    pub fn versions(&self) -> &[LoadedVersion] {
        &self.loaded_versions
    }

    /// The version served at the route base path.
    #[must_use]
    pub fn last_version(&self) -> &LoadedVersion {
        &self.loaded_versions[self.last]
    }

    /// Look up a version by name.
    #[must_use]
    pub fn version(&self, name: &str) -> Option<&LoadedVersion> {
        self.loaded_versions.iter().find(|v| v.name() == name)
    }

    /// Versions in route matching order.
    ///
    /// Higher `route_priority` first, missing priority counting as `0`; ties
    /// keep declaration order. The last version owns the bare route base path
    /// and so is matched after every other version.
    #[must_use]
    pub fn route_order(&self) -> Vec<&LoadedVersion> {
        let mut versions: Vec<&LoadedVersion> = self.loaded_versions.iter().collect();
        sort_for_routes(&mut versions, |v| &v.metadata);
        versions
    }

    /// Total number of docs across versions.
    #[must_use]
    pub fn doc_count(&self) -> usize {
        self.loaded_versions.iter().map(|v| v.docs.len()).sum()
    }
}

/// Load every version of the plugin instance.
///
/// # Errors
///
/// Returns the first error of option validation, version resolution, or any
/// version load.
pub fn load_content(config: &Config, storage: &dyn DocStorage) -> Result<LoadedContent, DocsError> {
    let start = Instant::now();
    config.validate()?;

    let versions = resolve_versions(config, storage)?;
    let loaded = versions
        .into_par_iter()
        .map(|version| load_version(version, config, storage))
        .collect::<Result<Vec<_>, _>>()?;

    let content = LoadedContent::new(loaded)?;

    tracing::info!(
        plugin = %config.docs.id,
        version_count = content.versions().len(),
        doc_count = content.doc_count(),
        last_version = content.last_version().name(),
        elapsed_ms = elapsed_ms(start),
        "Docs content loaded"
    );

    Ok(content)
}

/// Load one version: docs, sidebars, and navigation.
///
/// # Errors
///
/// Returns [`DocsError::DuplicateId`] and [`DocsError::DuplicatePermalink`]
/// for colliding docs, [`DocsError::Resolution`] for sidebar items naming
/// unknown docs, and [`DocsError::EmptyVersion`] when no doc is found.
pub fn load_version(
    version: VersionMetadata,
    config: &Config,
    storage: &dyn DocStorage,
) -> Result<LoadedVersion, DocsError> {
    let start = Instant::now();
    let name = version.version_name.clone();

    let files = storage.doc_files(&version.docs_dir_path, &config.docs.include)?;
    let mut docs = files
        .iter()
        .map(|file| process_doc_metadata(file, &version, config))
        .collect::<Result<Vec<_>, _>>()?;

    check_duplicates(&name, &docs)?;

    let raw_sidebars = read_sidebars(&version, storage)?;
    let known: HashSet<&str> = docs.iter().map(|d| d.id.as_str()).collect();
    let sidebars = resolve_doc_ids(&raw_sidebars, |id| {
        if known.contains(id) {
            return Some(id.to_owned());
        }
        let qualified = qualified_doc_id(&name, id);
        known.contains(qualified.as_str()).then_some(qualified)
    })
    .map_err(|e| DocsError::sidebar(&name, e))?;

    let order = create_order(&sidebars);
    let links: HashMap<String, DocNavLink> = docs
        .iter()
        .map(|d| (d.id.clone(), d.nav_link()))
        .collect();
    for doc in &mut docs {
        if let Some(entry) = order.get(&doc.id) {
            doc.sidebar.clone_from(&entry.sidebar);
            doc.previous = entry.previous.as_ref().and_then(|id| links.get(id)).cloned();
            doc.next = entry.next.as_ref().and_then(|id| links.get(id)).cloned();
        }
    }

    let permalink_to_sidebar = docs
        .iter()
        .filter_map(|d| Some((d.permalink.clone(), d.sidebar.clone()?)))
        .collect();

    let main_doc_id = main_doc_id(&docs, &sidebars).ok_or_else(|| DocsError::EmptyVersion(name.clone()))?;

    tracing::debug!(
        version = %name,
        doc_count = docs.len(),
        sidebar_count = sidebars.len(),
        main_doc_id = %main_doc_id,
        elapsed_ms = elapsed_ms(start),
        "Loaded version"
    );

    Ok(LoadedVersion {
        metadata: version,
        main_doc_id,
        docs,
        sidebars,
        permalink_to_sidebar,
    })
}

fn check_duplicates(version: &str, docs: &[DocMetadata]) -> Result<(), DocsError> {
    let mut ids: HashMap<&str, &str> = HashMap::new();
    let mut permalinks: HashMap<&str, &str> = HashMap::new();

    for doc in docs {
        if let Some(first) = ids.insert(&doc.id, &doc.source) {
            return Err(DocsError::DuplicateId {
                version: version.to_owned(),
                id: doc.id.clone(),
                first: first.to_owned(),
                second: doc.source.clone(),
            });
        }
        if let Some(first) = permalinks.insert(&doc.permalink, &doc.source) {
            return Err(DocsError::DuplicatePermalink {
                version: version.to_owned(),
                permalink: doc.permalink.clone(),
                first: first.to_owned(),
                second: doc.source.clone(),
            });
        }
    }

    Ok(())
}

/// Read and normalize the sidebar file of a version.
///
/// A missing file means no sidebars.
fn read_sidebars(version: &VersionMetadata, storage: &dyn DocStorage) -> Result<Sidebars, DocsError> {
    let Some(path) = &version.sidebar_file_path else {
        return Ok(Sidebars::new());
    };

    if !storage.exists(path) {
        if version.is_current() {
            tracing::warn!(path = %path.display(), "Sidebar file not found, docs will have no sidebars");
        } else {
            tracing::debug!(version = %version.version_name, path = %path.display(), "No versioned sidebars");
        }
        return Ok(Sidebars::new());
    }

    let content = storage.read(path)?;
    parse_sidebars(&content).map_err(|e| DocsError::sidebar(&version.version_name, e))
}

/// Home doc, else first doc of the first sidebar, else first doc.
fn main_doc_id(docs: &[DocMetadata], sidebars: &Sidebars) -> Option<String> {
    if let Some(home) = docs.iter().find(|d| d.is_docs_home_page) {
        return Some(home.unversioned_id.clone());
    }

    let first_in_sidebar = sidebars
        .values()
        .next()
        .and_then(|items| collect_doc_ids(items).first().copied())
        .and_then(|id| docs.iter().find(|d| d.id == id));

    first_in_sidebar
        .or_else(|| docs.first())
        .map(|d| d.unversioned_id.clone())
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use pretty_assertions::assert_eq;
    use vd_sidebars::SidebarItem;
    use vd_storage::MockStorage;

    use super::*;

    static_assertions::assert_impl_all!(LoadedContent: Send, Sync);
    static_assertions::assert_impl_all!(LoadedVersion: Send, Sync);

    fn config() -> Config {
        let mut config = Config::for_site(Path::new("/site"));
        config.docs.paths.sidebar_path = Some(PathBuf::from("/site/sidebars.json"));
        config
    }

    fn site() -> MockStorage {
        MockStorage::new()
            .with_file("/site/versions.json", r#"["1.0.0"]"#)
            .with_file(
                "/site/sidebars.json",
                r#"{"docs": ["intro", {"Guides": ["guides/setup", "guides/deploy"]}]}"#,
            )
            .with_doc_file("/site/docs/intro.md", "# Introduction\n\nStart here.")
            .with_doc_file("/site/docs/guides/setup.md", "---\nsidebar_label: Setup\n---\n# Setting up")
            .with_doc_file("/site/docs/guides/deploy.md", "# Deploy")
            .with_doc_file("/site/docs/changelog.md", "# Changelog")
            .with_file(
                "/site/versioned_sidebars/version-1.0.0-sidebars.json",
                r#"{"docs": ["version-1.0.0/intro", "guides/setup"]}"#,
            )
            .with_doc_file("/site/versioned_docs/version-1.0.0/intro.md", "# Old intro")
            .with_doc_file("/site/versioned_docs/version-1.0.0/guides/setup.md", "# Old setup")
    }

    #[test]
    fn test_load_content_versions() {
        let content = load_content(&config(), &site()).unwrap();

        let names: Vec<_> = content.versions().iter().map(LoadedVersion::name).collect();
        assert_eq!(names, vec!["current", "1.0.0"]);
        assert_eq!(content.last_version().name(), "1.0.0");
        assert_eq!(content.doc_count(), 6);
    }

    #[test]
    fn test_load_version_navigation() {
        let content = load_content(&config(), &site()).unwrap();
        let current = content.version("current").unwrap();

        let intro = current.doc("intro").unwrap();
        assert_eq!(intro.permalink, "/docs/next/intro");
        assert_eq!(intro.sidebar.as_deref(), Some("docs"));
        assert_eq!(intro.previous, None);
        assert_eq!(
            intro.next,
            Some(DocNavLink {
                title: "Setup".to_owned(),
                permalink: "/docs/next/guides/setup".to_owned(),
            })
        );

        let setup = current.doc("guides/setup").unwrap();
        assert_eq!(setup.previous.as_ref().map(|l| l.title.as_str()), Some("Introduction"));
        assert_eq!(setup.next.as_ref().map(|l| l.title.as_str()), Some("Deploy"));

        let changelog = current.doc("changelog").unwrap();
        assert_eq!(changelog.sidebar, None);
        assert_eq!(changelog.next, None);
    }

    #[test]
    fn test_load_version_sidebar_id_fallback() {
        let content = load_content(&config(), &site()).unwrap();
        let released = content.version("1.0.0").unwrap();

        assert_eq!(
            released.sidebars["docs"],
            vec![
                SidebarItem::doc("version-1.0.0/intro"),
                SidebarItem::doc("version-1.0.0/guides/setup"),
            ]
        );
        let setup = released.doc("version-1.0.0/guides/setup").unwrap();
        assert_eq!(setup.permalink, "/docs/guides/setup");
        assert_eq!(setup.previous.as_ref().map(|l| l.permalink.as_str()), Some("/docs/intro"));
    }

    #[test]
    fn test_load_version_permalink_to_sidebar() {
        let content = load_content(&config(), &site()).unwrap();
        let current = content.version("current").unwrap();

        let expected: BTreeMap<String, String> = [
            ("/docs/next/guides/deploy", "docs"),
            ("/docs/next/guides/setup", "docs"),
            ("/docs/next/intro", "docs"),
        ]
        .into_iter()
        .map(|(p, s)| (p.to_owned(), s.to_owned()))
        .collect();
        assert_eq!(current.permalink_to_sidebar, expected);
    }

    #[test]
    fn test_source_to_permalink() {
        let content = load_content(&config(), &site()).unwrap();
        let released = content.version("1.0.0").unwrap();

        let map = released.source_to_permalink();

        assert_eq!(
            map.get("@site/versioned_docs/version-1.0.0/intro.md").map(String::as_str),
            Some("/docs/intro")
        );
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_main_doc_id_first_sidebar_doc() {
        let content = load_content(&config(), &site()).unwrap();

        assert_eq!(content.version("current").unwrap().main_doc_id, "intro");
        assert_eq!(content.version("1.0.0").unwrap().main_doc_id, "intro");
    }

    #[test]
    fn test_main_doc_id_home_page() {
        let mut config = config();
        config.docs.metadata.home_page_id = Some("guides/deploy".to_owned());

        let content = load_content(&config, &site()).unwrap();

        let current = content.version("current").unwrap();
        assert_eq!(current.main_doc_id, "guides/deploy");
        assert_eq!(current.doc("guides/deploy").unwrap().permalink, "/docs/next/");
    }

    #[test]
    fn test_main_doc_id_without_sidebars() {
        let storage = MockStorage::new()
            .with_doc_file("/site/docs/b.md", "# B")
            .with_doc_file("/site/docs/a.md", "# A");

        let content = load_content(&config(), &storage).unwrap();

        assert_eq!(content.last_version().main_doc_id, "a");
        assert!(content.last_version().sidebars.is_empty());
    }

    #[test]
    fn test_empty_version() {
        let storage = MockStorage::new();
        let err = load_content(&config(), &storage).unwrap_err();
        assert!(matches!(err, DocsError::EmptyVersion(ref v) if v == "current"));
    }

    #[test]
    fn test_unknown_sidebar_doc() {
        let storage = MockStorage::new()
            .with_doc_file("/site/docs/intro.md", "# Intro")
            .with_file("/site/sidebars.json", r#"{"docs": ["intro", "missing"]}"#);

        let err = load_content(&config(), &storage).unwrap_err();

        match err {
            DocsError::Resolution { version, sidebar, id } => {
                assert_eq!(version, "current");
                assert_eq!(sidebar, "docs");
                assert_eq!(id, "missing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_sidebar_item() {
        let storage = MockStorage::new()
            .with_doc_file("/site/docs/intro.md", "# Intro")
            .with_file("/site/sidebars.json", r#"{"docs": [{"type": "video", "id": "intro"}]}"#);

        let err = load_content(&config(), &storage).unwrap_err();

        assert!(matches!(err, DocsError::Sidebar { ref version, .. } if version == "current"));
    }

    #[test]
    fn test_duplicate_id() {
        let storage = MockStorage::new()
            .with_doc_file("/site/docs/intro.md", "# Intro")
            .with_doc_file("/site/docs/start.md", "---\nid: intro\nslug: /start\n---\n");

        let err = load_content(&config(), &storage).unwrap_err();

        match err {
            DocsError::DuplicateId { id, first, second, .. } => {
                assert_eq!(id, "intro");
                assert_eq!(first, "@site/docs/intro.md");
                assert_eq!(second, "@site/docs/start.md");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_permalink() {
        let storage = MockStorage::new()
            .with_doc_file("/site/docs/intro.md", "# Intro")
            .with_doc_file("/site/docs/start.md", "---\nslug: /intro\n---\n");

        let err = load_content(&config(), &storage).unwrap_err();

        assert!(matches!(err, DocsError::DuplicatePermalink { ref permalink, .. } if permalink == "/docs/intro"));
    }

    #[test]
    fn test_missing_sidebar_file_means_no_sidebars() {
        let storage = MockStorage::new().with_doc_file("/site/docs/intro.md", "# Intro");

        let content = load_content(&config(), &storage).unwrap();

        assert!(content.last_version().sidebars.is_empty());
        assert!(content.last_version().permalink_to_sidebar.is_empty());
    }

    #[test]
    fn test_storage_failure_propagates() {
        let err = load_content(&config(), &site().unavailable()).unwrap_err();
        assert!(matches!(err, DocsError::Storage(_)));
    }

    #[test]
    fn test_route_order_priority() {
        let storage = site()
            .with_file("/site/versions.json", r#"["2.0.0", "1.0.0"]"#)
            .with_doc_file("/site/versioned_docs/version-2.0.0/intro.md", "# Intro 2");

        let content = load_content(&config(), &storage).unwrap();

        let two = content.version("2.0.0").unwrap();
        let one = content.version("1.0.0").unwrap();
        assert_eq!(two.metadata.route_priority, Some(-1));
        assert!(two.metadata.is_last);
        assert_eq!(one.metadata.route_priority, None);
        assert_eq!(content.versions().iter().filter(|v| v.metadata.is_last).count(), 1);

        let order: Vec<_> = content.route_order().into_iter().map(LoadedVersion::name).collect();
        assert_eq!(order, vec!["current", "1.0.0", "2.0.0"]);
    }

    #[test]
    fn test_loaded_content_rejects_two_last_versions() {
        let content = load_content(&config(), &site()).unwrap();
        let mut versions = content.versions().to_vec();
        for v in &mut versions {
            v.metadata.is_last = true;
        }

        let err = LoadedContent::new(versions).unwrap_err();

        assert!(err.to_string().contains("exactly one last version, found 2"));
    }

    #[test]
    fn test_loaded_content_rejects_no_last_version() {
        let content = load_content(&config(), &site()).unwrap();
        let mut versions = content.versions().to_vec();
        for v in &mut versions {
            v.metadata.is_last = false;
        }

        let err = LoadedContent::new(versions).unwrap_err();

        assert!(matches!(err, DocsError::VersionIntegrity(_)));
        assert!(err.to_string().contains("exactly one last version, found 0"));
    }

    #[test]
    fn test_loaded_content_rejects_unknown_main_doc() {
        let content = load_content(&config(), &site()).unwrap();
        let mut versions = content.versions().to_vec();
        versions[1].main_doc_id = "guides/deploy".to_owned();

        let err = LoadedContent::new(versions).unwrap_err();

        assert!(matches!(err, DocsError::VersionIntegrity(_)));
        assert!(err.to_string().contains("main doc guides/deploy of version 1.0.0 does not exist"));
    }

    #[test]
    fn test_loaded_content_rejects_duplicate_names() {
        let content = load_content(&config(), &site()).unwrap();
        let last = content.last_version().clone();

        let err = LoadedContent::new(vec![last.clone(), last]).unwrap_err();

        assert!(matches!(err, DocsError::VersionIntegrity(_)));
    }

    #[test]
    fn test_load_content_validates_options() {
        let mut config = config();
        config.docs.id = String::new();

        let err = load_content(&config, &site()).unwrap_err();

        assert!(matches!(err, DocsError::Config(_)));
    }

    #[test]
    fn test_loaded_version_serialization() {
        let content = load_content(&config(), &site()).unwrap();

        let json = serde_json::to_value(content.last_version()).unwrap();

        assert_eq!(json["versionName"], "1.0.0");
        assert_eq!(json["isLast"], true);
        assert_eq!(json["mainDocId"], "intro");
        assert_eq!(json["sidebars"]["docs"][0]["type"], "doc");
        assert_eq!(json["permalinkToSidebar"]["/docs/intro"], "docs");
    }
}
