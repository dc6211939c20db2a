//! Canonical sidebar tree.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::SidebarError;

/// Canonical sidebar node.
///
/// Every node is exactly one of doc, ref, link, or category. Categories
/// always carry an explicit `collapsed` flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SidebarItem {
    /// Document reference taking part in navigation order.
    Doc {
        /// Document id.
        id: String,
    },
    /// Document reference excluded from navigation order and ownership.
    Ref {
        /// Document id.
        id: String,
    },
    /// External link.
    Link {
        /// Link target.
        href: String,
        /// Display label.
        label: String,
    },
    /// Labelled group of items.
    Category {
        /// Display label.
        label: String,
        /// Ordered children.
        items: Vec<SidebarItem>,
        /// Whether the category starts collapsed.
        collapsed: bool,
    },
}

impl SidebarItem {
    /// Create a doc item.
    #[must_use]
    pub fn doc(id: impl Into<String>) -> Self {
        Self::Doc { id: id.into() }
    }

    /// Create an expanded category.
    #[must_use]
    pub fn category(label: impl Into<String>, items: Vec<SidebarItem>) -> Self {
        Self::Category {
            label: label.into(),
            items,
            collapsed: false,
        }
    }

    /// Create a link item.
    #[must_use]
    pub fn link(href: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Link {
            href: href.into(),
            label: label.into(),
        }
    }
}

/// Sidebars by id, in declaration order.
pub type Sidebars = IndexMap<String, Vec<SidebarItem>>;

/// Collect doc ids in depth-first pre-order.
///
/// Only [`SidebarItem::Doc`] leaves are collected; refs and links are skipped.
#[must_use]
pub fn collect_doc_ids(items: &[SidebarItem]) -> Vec<&str> {
    fn walk<'a>(items: &'a [SidebarItem], out: &mut Vec<&'a str>) {
        for item in items {
            match item {
                SidebarItem::Doc { id } => out.push(id),
                SidebarItem::Category { items, .. } => walk(items, out),
                SidebarItem::Ref { .. } | SidebarItem::Link { .. } => {}
            }
        }
    }

    let mut ids = Vec::new();
    walk(items, &mut ids);
    ids
}

/// Rewrite every doc and ref id through `resolve`.
///
/// # Errors
///
/// Returns [`SidebarError::UnknownDoc`] for the first id `resolve` rejects.
pub fn resolve_doc_ids<F>(sidebars: &Sidebars, resolve: F) -> Result<Sidebars, SidebarError>
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve_items<F>(
        sidebar: &str,
        items: &[SidebarItem],
        resolve: &F,
    ) -> Result<Vec<SidebarItem>, SidebarError>
    where
        F: Fn(&str) -> Option<String>,
    {
        items
            .iter()
            .map(|item| {
                let unknown = |id: &str| SidebarError::UnknownDoc {
                    sidebar: sidebar.to_owned(),
                    id: id.to_owned(),
                };
                Ok(match item {
                    SidebarItem::Doc { id } => SidebarItem::Doc {
                        id: resolve(id).ok_or_else(|| unknown(id))?,
                    },
                    SidebarItem::Ref { id } => SidebarItem::Ref {
                        id: resolve(id).ok_or_else(|| unknown(id))?,
                    },
                    SidebarItem::Link { .. } => item.clone(),
                    SidebarItem::Category {
                        label,
                        items,
                        collapsed,
                    } => SidebarItem::Category {
                        label: label.clone(),
                        items: resolve_items(sidebar, items, resolve)?,
                        collapsed: *collapsed,
                    },
                })
            })
            .collect()
    }

    sidebars
        .iter()
        .map(|(name, items)| Ok((name.clone(), resolve_items(name, items, &resolve)?)))
        .collect()
}
