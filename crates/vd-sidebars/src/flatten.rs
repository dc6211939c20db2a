//! Linear view of a sidebar tree.
//!
//! [`flatten`] walks the tree depth-first and records, for every leaf, the
//! chain of categories above it. [`regroup`] rebuilds the tree from that
//! sequence, so `regroup(&flatten(items)) == items`.

use crate::item::SidebarItem;

/// Category on the path from the sidebar root to a leaf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryKey {
    /// Index of the category among its siblings.
    pub position: usize,
    /// Category label.
    pub label: String,
    /// Category collapsed flag.
    pub collapsed: bool,
}

/// One step of a flattened sidebar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatEntry {
    /// Categories enclosing the leaf, outermost first.
    pub trail: Vec<CategoryKey>,
    /// Doc, ref, or link leaf. `None` marks an empty category, which is the
    /// last element of `trail`.
    pub leaf: Option<SidebarItem>,
}

/// Flatten a sidebar into leaves in depth-first pre-order.
#[must_use]
pub fn flatten(items: &[SidebarItem]) -> Vec<FlatEntry> {
    fn walk(items: &[SidebarItem], trail: &mut Vec<CategoryKey>, out: &mut Vec<FlatEntry>) {
        for (position, item) in items.iter().enumerate() {
            match item {
                SidebarItem::Category {
                    label,
                    items,
                    collapsed,
                } => {
                    trail.push(CategoryKey {
                        position,
                        label: label.clone(),
                        collapsed: *collapsed,
                    });
                    if items.is_empty() {
                        out.push(FlatEntry {
                            trail: trail.clone(),
                            leaf: None,
                        });
                    } else {
                        walk(items, trail, out);
                    }
                    trail.pop();
                }
                leaf => out.push(FlatEntry {
                    trail: trail.clone(),
                    leaf: Some(leaf.clone()),
                }),
            }
        }
    }

    let mut out = Vec::new();
    walk(items, &mut Vec::new(), &mut out);
    out
}

/// Rebuild a sidebar tree from flattened entries.
///
/// Consecutive entries sharing the same category key at a depth are grouped
/// into one category.
#[must_use]
pub fn regroup(entries: &[FlatEntry]) -> Vec<SidebarItem> {
    regroup_level(entries, 0)
}

fn regroup_level(entries: &[FlatEntry], depth: usize) -> Vec<SidebarItem> {
    let mut items = Vec::new();
    let mut i = 0;

    while i < entries.len() {
        let entry = &entries[i];
        if entry.trail.len() <= depth {
            if let Some(leaf) = &entry.leaf {
                items.push(leaf.clone());
            }
            i += 1;
            continue;
        }

        let key = &entry.trail[depth];
        let end = entries[i..]
            .iter()
            .position(|e| e.trail.get(depth) != Some(key))
            .map_or(entries.len(), |offset| i + offset);

        items.push(SidebarItem::Category {
            label: key.label.clone(),
            items: regroup_level(&entries[i..end], depth + 1),
            collapsed: key.collapsed,
        });
        i = end;
    }

    items
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> Vec<SidebarItem> {
        vec![
            SidebarItem::doc("a"),
            SidebarItem::category(
                "Guides",
                vec![
                    SidebarItem::doc("b"),
                    SidebarItem::category("Deep", vec![SidebarItem::doc("c")]),
                    SidebarItem::link("https://example.com", "Ext"),
                ],
            ),
            SidebarItem::category("Guides", vec![SidebarItem::doc("d")]),
            SidebarItem::Category {
                label: "Empty".to_owned(),
                items: Vec::new(),
                collapsed: true,
            },
            SidebarItem::Ref { id: "e".to_owned() },
        ]
    }

    #[test]
    fn test_flatten_records_trails() {
        let entries = flatten(&sample());

        assert_eq!(entries.len(), 7);
        assert!(entries[0].trail.is_empty());
        assert_eq!(entries[0].leaf, Some(SidebarItem::doc("a")));

        let labels: Vec<_> = entries[2].trail.iter().map(|k| k.label.as_str()).collect();
        assert_eq!(labels, vec!["Guides", "Deep"]);
        assert_eq!(entries[2].leaf, Some(SidebarItem::doc("c")));

        assert_eq!(entries[5].trail[0].label, "Empty");
        assert!(entries[5].leaf.is_none());
    }

    #[test]
    fn test_flatten_empty_sidebar() {
        assert!(flatten(&[]).is_empty());
    }

    #[test]
    fn test_regroup_round_trip() {
        let items = sample();
        assert_eq!(regroup(&flatten(&items)), items);
    }

    #[test]
    fn test_regroup_keeps_adjacent_same_label_categories_apart() {
        let items = vec![
            SidebarItem::category("Same", vec![SidebarItem::doc("a")]),
            SidebarItem::category("Same", vec![SidebarItem::doc("b")]),
        ];
        assert_eq!(regroup(&flatten(&items)), items);
    }

    #[test]
    fn test_regroup_nested_empty_category() {
        let items = vec![SidebarItem::category(
            "Outer",
            vec![
                SidebarItem::category("Inner", Vec::new()),
                SidebarItem::doc("x"),
            ],
        )];
        assert_eq!(regroup(&flatten(&items)), items);
    }
}
