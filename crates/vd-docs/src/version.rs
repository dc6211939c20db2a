//! Version resolution.
//!
//! Turns plugin options and the site's `versions.json` into the list of
//! [`VersionMetadata`] to load.
//!
//! # Layout
//!
//! ```text
//! site/
//! ├── docs/                                  # "current" version
//! ├── sidebars.json
//! ├── versions.json                          # ["2.0.0", "1.0.0"], newest first
//! ├── versioned_docs/version-2.0.0/
//! └── versioned_sidebars/version-2.0.0-sidebars.json
//! ```
//!
//! The newest released version is the last version and is served at the
//! route base path. The working copy is served under `/next`, older versions
//! under `/{name}`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use vd_config::Config;
use vd_storage::DocStorage;

use crate::DocsError;
use crate::url::normalize_url;

/// Name of the working copy version.
pub const CURRENT_VERSION_NAME: &str = "current";

/// File listing released versions, newest first.
pub const VERSIONS_FILENAME: &str = "versions.json";

const VERSIONED_DOCS_DIR: &str = "versioned_docs";
const VERSIONED_SIDEBARS_DIR: &str = "versioned_sidebars";

/// Route priority of the last version; sorts after every other version.
pub const LAST_VERSION_ROUTE_PRIORITY: i32 = -1;

/// One documentation version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionMetadata {
    /// Version name (e.g., "1.0.0", "current").
    pub version_name: String,
    /// Display label (e.g., "1.0.0", "Next").
    pub version_label: String,
    /// URL path prefix (e.g., "/docs/1.0.0").
    pub version_path: String,
    /// Whether this is the last (default) version.
    pub is_last: bool,
    /// Directory holding the version's documents.
    pub docs_dir_path: PathBuf,
    /// Sidebar definition file, `None` when no sidebars are configured.
    pub sidebar_file_path: Option<PathBuf>,
    /// Route matching priority; `Some(-1)` for the last version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_priority: Option<i32>,
}

impl VersionMetadata {
    /// Whether this is the working copy version.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.version_name == CURRENT_VERSION_NAME
    }

    /// Key versions are matched by, highest first.
    ///
    /// Versions without priority count as `0`. Among equal keys the
    /// declaration order is kept (stable sort).
    #[must_use]
    pub fn route_sort_key(&self) -> i32 {
        self.route_priority.unwrap_or(0)
    }
}

/// URL prefix all versions share: base URL plus route base path.
#[must_use]
pub fn route_base_url(config: &Config) -> String {
    normalize_url(&[
        &config.site.base_url,
        &config.docs.metadata.route_base_path,
    ])
}

/// Qualify an unversioned doc id with its version.
///
/// Working copy ids stay unqualified, released ones get a
/// `version-{name}/` prefix.
#[must_use]
pub fn qualified_doc_id(version_name: &str, unversioned_id: &str) -> String {
    if version_name == CURRENT_VERSION_NAME {
        unversioned_id.to_owned()
    } else {
        format!("version-{version_name}/{unversioned_id}")
    }
}

/// Read released version names from `versions.json`.
///
/// Returns `Ok(None)` when the file doesn't exist.
///
/// # Errors
///
/// Returns [`DocsError::VersionsFile`] for malformed JSON and
/// [`DocsError::VersionIntegrity`] for invalid or duplicate names.
pub fn read_version_names(
    site_dir: &Path,
    storage: &dyn DocStorage,
) -> Result<Option<Vec<String>>, DocsError> {
    let path = site_dir.join(VERSIONS_FILENAME);
    if !storage.exists(&path) {
        return Ok(None);
    }

    let content = storage.read(&path)?;
    let names: Vec<String> =
        serde_json::from_str(&content).map_err(|source| DocsError::VersionsFile {
            path: path.clone(),
            source,
        })?;

    let mut seen = HashSet::new();
    for name in &names {
        validate_version_name(name)?;
        if !seen.insert(name.as_str()) {
            return Err(DocsError::VersionIntegrity(format!(
                "version {name} is listed twice in {}",
                path.display()
            )));
        }
    }

    Ok(Some(names))
}

fn validate_version_name(name: &str) -> Result<(), DocsError> {
    let reason = if name.is_empty() {
        Some("version name cannot be empty")
    } else if name.contains('/') || name.contains('\\') {
        Some("version name cannot include slashes")
    } else if name == "." || name == ".." {
        Some("version name cannot be a relative path segment")
    } else if name == CURRENT_VERSION_NAME {
        Some("version name is reserved for the working copy")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(DocsError::VersionIntegrity(format!(
            "invalid version name \"{name}\": {reason}"
        ))),
        None => Ok(()),
    }
}

/// Resolve every version to load, in declaration order.
///
/// The working copy comes first when included, followed by the released
/// versions in `versions.json` order.
///
/// # Errors
///
/// Returns [`DocsError::VersionIntegrity`] when no version would be published,
/// and the errors of [`read_version_names`].
pub fn resolve_versions(
    config: &Config,
    storage: &dyn DocStorage,
) -> Result<Vec<VersionMetadata>, DocsError> {
    let options = &config.docs;
    let site_dir = &config.site.site_dir;

    let released = if options.disable_versioning {
        Vec::new()
    } else {
        read_version_names(site_dir, storage)?.unwrap_or_default()
    };

    let mut names: Vec<&str> = Vec::with_capacity(released.len() + 1);
    if options.include_current_version {
        names.push(CURRENT_VERSION_NAME);
    }
    names.extend(released.iter().map(String::as_str));

    let last_name = match released.first() {
        Some(name) => name.as_str(),
        None if options.include_current_version => CURRENT_VERSION_NAME,
        None => {
            return Err(DocsError::VersionIntegrity(
                "no version to publish: the working copy is excluded and versions.json lists no versions"
                    .to_owned(),
            ));
        }
    };

    let base = route_base_url(config);

    let versions = names
        .into_iter()
        .map(|name| {
            let is_last = name == last_name;
            let is_current = name == CURRENT_VERSION_NAME;

            let version_path = if is_last {
                base.clone()
            } else if is_current {
                normalize_url(&[&base, "next"])
            } else {
                normalize_url(&[&base, name])
            };

            let (docs_dir_path, sidebar_file_path) = if is_current {
                (
                    options.paths.path.clone(),
                    options.paths.sidebar_path.clone(),
                )
            } else {
                (
                    site_dir
                        .join(VERSIONED_DOCS_DIR)
                        .join(format!("version-{name}")),
                    Some(
                        site_dir
                            .join(VERSIONED_SIDEBARS_DIR)
                            .join(format!("version-{name}-sidebars.json")),
                    ),
                )
            };

            VersionMetadata {
                version_name: name.to_owned(),
                version_label: if is_current {
                    "Next".to_owned()
                } else {
                    name.to_owned()
                },
                version_path,
                is_last,
                docs_dir_path,
                sidebar_file_path,
                route_priority: is_last.then_some(LAST_VERSION_ROUTE_PRIORITY),
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        plugin = %options.id,
        versions = ?versions.iter().map(|v| v.version_name.as_str()).collect::<Vec<_>>(),
        last = last_name,
        "Resolved versions"
    );

    Ok(versions)
}

/// Sort versions for route matching: higher priority first, stable.
pub fn sort_for_routes<T, F>(versions: &mut [T], metadata: F)
where
    F: Fn(&T) -> &VersionMetadata,
{
    versions.sort_by_key(|v| std::cmp::Reverse(metadata(v).route_sort_key()));
}
