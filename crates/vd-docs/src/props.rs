//! Sidebar props handed to the doc page layout.
//!
//! Doc and ref items are replaced by links to the doc permalink, so the
//! client renders sidebars without knowing about ids.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use serde::Serialize;
use vd_sidebars::SidebarItem;

use crate::DocsError;
use crate::loader::LoadedVersion;
use crate::metadata::DocNavLink;

/// Renderable sidebar node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PropSidebarItem {
    Link {
        href: String,
        label: String,
    },
    Category {
        label: String,
        items: Vec<PropSidebarItem>,
        collapsed: bool,
    },
}

/// Renderable sidebars by id, in declaration order.
pub type PropSidebars = IndexMap<String, Vec<PropSidebarItem>>;

/// Version props of the doc page layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropVersionMetadata {
    pub version: String,
    pub docs_sidebars: PropSidebars,
    pub permalink_to_sidebar: BTreeMap<String, String>,
}

impl PropVersionMetadata {
    /// # Errors
    ///
    /// See [`to_sidebars_prop`].
    pub fn from_version(version: &LoadedVersion) -> Result<Self, DocsError> {
        Ok(Self {
            version: version.metadata.version_name.clone(),
            docs_sidebars: to_sidebars_prop(version)?,
            permalink_to_sidebar: version.permalink_to_sidebar.clone(),
        })
    }
}

/// Convert a version's sidebars into renderable props.
///
/// Doc and ref items become links labelled with the doc's sidebar label, or
/// its title when unset.
///
/// # Errors
///
/// Returns [`DocsError::Resolution`] if an item names a doc the version
/// doesn't have.
pub fn to_sidebars_prop(version: &LoadedVersion) -> Result<PropSidebars, DocsError> {
    fn convert(
        links: &HashMap<&str, DocNavLink>,
        version: &str,
        sidebar: &str,
        items: &[SidebarItem],
    ) -> Result<Vec<PropSidebarItem>, DocsError> {
        items
            .iter()
            .map(|item| match item {
                SidebarItem::Doc { id } | SidebarItem::Ref { id } => {
                    let link = links.get(id.as_str()).ok_or_else(|| DocsError::Resolution {
                        version: version.to_owned(),
                        sidebar: sidebar.to_owned(),
                        id: id.clone(),
                    })?;
                    Ok(PropSidebarItem::Link {
                        href: link.permalink.clone(),
                        label: link.title.clone(),
                    })
                }
                SidebarItem::Link { href, label } => Ok(PropSidebarItem::Link {
                    href: href.clone(),
                    label: label.clone(),
                }),
                SidebarItem::Category {
                    label,
                    items,
                    collapsed,
                } => Ok(PropSidebarItem::Category {
                    label: label.clone(),
                    items: convert(links, version, sidebar, items)?,
                    collapsed: *collapsed,
                }),
            })
            .collect()
    }

    let links: HashMap<&str, DocNavLink> = version
        .docs
        .iter()
        .map(|d| (d.id.as_str(), d.nav_link()))
        .collect();

    version
        .sidebars
        .iter()
        .map(|(name, items)| Ok((name.clone(), convert(&links, version.name(), name, items)?)))
        .collect()
}
