//! Navigation order derived from sidebars.

use std::collections::HashMap;

use serde::Serialize;

use crate::item::{Sidebars, collect_doc_ids};

/// Navigation neighbors and owning sidebar of one doc.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OrderMetadata {
    /// Id of the preceding doc in the sidebar sequence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    /// Id of the following doc in the sidebar sequence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Sidebar the doc belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar: Option<String>,
}

/// Order metadata by doc id. Docs outside every sidebar are absent.
pub type Order = HashMap<String, OrderMetadata>;

/// Compute previous/next/sidebar for every doc item of every sidebar.
///
/// Each sidebar is flattened into its doc ids (depth-first, pre-order) and
/// each doc is paired with its immediate neighbors. Refs do not take part.
/// A doc listed more than once keeps the entry of its last occurrence.
#[must_use]
pub fn create_order(sidebars: &Sidebars) -> Order {
    let mut order = Order::new();

    for (sidebar, items) in sidebars {
        let ids = collect_doc_ids(items);
        for (i, id) in ids.iter().enumerate() {
            let metadata = OrderMetadata {
                previous: i.checked_sub(1).map(|p| ids[p].to_owned()),
                next: ids.get(i + 1).map(|&n| n.to_owned()),
                sidebar: Some(sidebar.clone()),
            };
            if let Some(existing) = order.insert((*id).to_owned(), metadata) {
                tracing::warn!(
                    doc = %id,
                    sidebar = %sidebar,
                    previous_sidebar = existing.sidebar.as_deref().unwrap_or_default(),
                    "Doc appears more than once in sidebars, last occurrence wins"
                );
            }
        }
    }

    order
}
