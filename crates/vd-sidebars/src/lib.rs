//! Sidebar definitions and navigation order for versioned documentation.
//!
//! This crate provides:
//! - [`parse_sidebars`]: parse a sidebar definition file into canonical [`Sidebars`]
//! - [`normalize_item`]: normalize one raw item (bare id, shorthand, tagged object)
//! - [`flatten`] / [`regroup`]: linearize a tree and rebuild it
//! - [`create_order`]: previous/next/sidebar for every doc in the sidebars
//!
//! # Raw Forms
//!
//! Sidebar files accept several shapes that all normalize to [`SidebarItem`]:
//!
//! ```json
//! {
//!   "docs": {
//!     "Guides": ["intro", "setup"],
//!     "Reference": [
//!       { "type": "link", "href": "https://example.com", "label": "API" },
//!       { "type": "category", "label": "Nested", "items": ["faq"] }
//!     ]
//!   }
//! }
//! ```

mod error;
mod flatten;
mod item;
mod order;
mod raw;

pub use error::SidebarError;
pub use flatten::{CategoryKey, FlatEntry, flatten, regroup};
pub use item::{SidebarItem, Sidebars, collect_doc_ids, resolve_doc_ids};
pub use order::{Order, OrderMetadata, create_order};
pub use raw::{normalize_item, normalize_items, normalize_sidebars, parse_sidebars};
