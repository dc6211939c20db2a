//! Client-side global data.
//!
//! The smallest view of the loaded content the client router needs to map a
//! location to a version and a doc.

use serde::Serialize;
use vd_config::Config;

use crate::loader::{LoadedContent, LoadedVersion};
use crate::version::route_base_url;

/// Global data published for one plugin instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalPluginData {
    /// Route base of every version (e.g., "/docs").
    pub path: String,
    pub versions: Vec<GlobalVersion>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalVersion {
    pub name: String,
    pub label: String,
    pub is_last: bool,
    pub path: String,
    /// Unversioned id of the entry doc.
    pub main_doc_id: String,
    pub docs: Vec<GlobalDoc>,
}

/// Doc reference: unversioned id and permalink.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GlobalDoc {
    pub id: String,
    pub path: String,
}

impl GlobalPluginData {
    /// Project loaded content into global data, versions in declaration order.
    #[must_use]
    pub fn from_content(content: &LoadedContent, config: &Config) -> Self {
        Self {
            path: route_base_url(config),
            versions: content.versions().iter().map(GlobalVersion::from_version).collect(),
        }
    }
}

impl GlobalVersion {
    fn from_version(version: &LoadedVersion) -> Self {
        Self {
            name: version.metadata.version_name.clone(),
            label: version.metadata.version_label.clone(),
            is_last: version.metadata.is_last,
            path: version.metadata.version_path.clone(),
            main_doc_id: version.main_doc_id.clone(),
            docs: version
                .docs
                .iter()
                .map(|d| GlobalDoc {
                    id: d.unversioned_id.clone(),
                    path: d.permalink.clone(),
                })
                .collect(),
        }
    }
}
