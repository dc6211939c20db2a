//! Raw sidebar parsing and normalization.
//!
//! Raw items come in several shapes:
//! - `"intro"` - bare doc id
//! - `{"Guides": ["intro", "setup"]}` - shorthand, one category per key
//! - `{"type": "doc" | "ref", "id": ...}`
//! - `{"type": "link", "href": ..., "label": ...}`
//! - `{"type": "category", "label": ..., "items": [...], "collapsed"?: bool}`
//!
//! Normalization turns all of them into [`SidebarItem`] at ingestion; the
//! raw forms never leave this module.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::SidebarError;
use crate::item::{SidebarItem, Sidebars};

/// Parse a sidebar definition file.
///
/// The file is a JSON object mapping sidebar ids to either an item list or a
/// shorthand category mapping. Sidebar declaration order is preserved.
///
/// # Errors
///
/// Returns [`SidebarError::Parse`] for malformed JSON and the normalization
/// errors of [`normalize_item`] for invalid items.
pub fn parse_sidebars(content: &str) -> Result<Sidebars, SidebarError> {
    let raw: IndexMap<String, Value> = serde_json::from_str(content)?;
    raw.iter()
        .map(|(name, value)| Ok((name.clone(), normalize_sidebar(value)?)))
        .collect()
}

/// Normalize already-decoded sidebars.
///
/// Accepts the same shapes as [`parse_sidebars`]. Normalizing canonical
/// sidebars returns them unchanged.
///
/// # Errors
///
/// Returns [`SidebarError::InvalidItem`] if `value` is not an object, or the
/// errors of [`normalize_item`].
pub fn normalize_sidebars(value: &Value) -> Result<Sidebars, SidebarError> {
    let Value::Object(map) = value else {
        return Err(SidebarError::invalid(value, "sidebars must be an object"));
    };
    map.iter()
        .map(|(name, value)| Ok((name.clone(), normalize_sidebar(value)?)))
        .collect()
}

/// Normalize one sidebar: an item list or a shorthand mapping.
fn normalize_sidebar(value: &Value) -> Result<Vec<SidebarItem>, SidebarError> {
    match value {
        Value::Array(items) => normalize_items(items),
        Value::Object(map) => normalize_shorthand(value, map),
        other => Err(SidebarError::invalid(
            other,
            "sidebar must be an array or a category shorthand object",
        )),
    }
}

/// Normalize a list of raw items, flattening shorthand expansions in place.
///
/// # Errors
///
/// Returns the errors of [`normalize_item`].
pub fn normalize_items(items: &[Value]) -> Result<Vec<SidebarItem>, SidebarError> {
    let mut normalized = Vec::with_capacity(items.len());
    for item in items {
        normalized.extend(normalize_item(item)?);
    }
    Ok(normalized)
}

/// Normalize one raw item.
///
/// A shorthand object expands to one category per key, so the result is a
/// list.
///
/// # Errors
///
/// Returns [`SidebarError::InvalidItem`] for wrongly shaped items and
/// [`SidebarError::UnknownType`] for unknown `type` values.
pub fn normalize_item(value: &Value) -> Result<Vec<SidebarItem>, SidebarError> {
    match value {
        Value::String(id) => Ok(vec![SidebarItem::Doc { id: id.clone() }]),
        Value::Object(map) if map.contains_key("type") => Ok(vec![normalize_tagged(value, map)?]),
        Value::Object(map) => normalize_shorthand(value, map),
        other => Err(SidebarError::invalid(
            other,
            "expected a doc id, a shorthand object, or a typed item",
        )),
    }
}

/// Expand `{label: [items]}` into categories in key order.
fn normalize_shorthand(
    value: &Value,
    map: &Map<String, Value>,
) -> Result<Vec<SidebarItem>, SidebarError> {
    map.iter()
        .map(|(label, items)| {
            let Value::Array(items) = items else {
                return Err(SidebarError::invalid(
                    value,
                    format!("shorthand category \"{label}\" must map to an array"),
                ));
            };
            Ok(SidebarItem::Category {
                label: label.clone(),
                items: normalize_items(items)?,
                collapsed: false,
            })
        })
        .collect()
}

fn normalize_tagged(value: &Value, map: &Map<String, Value>) -> Result<SidebarItem, SidebarError> {
    let Some(Value::String(item_type)) = map.get("type") else {
        return Err(SidebarError::invalid(value, "\"type\" must be a string"));
    };

    match item_type.as_str() {
        "doc" | "ref" => {
            assert_keys(value, map, &["type", "id"])?;
            let id = required_string(value, map, "id")?;
            Ok(if item_type == "doc" {
                SidebarItem::Doc { id }
            } else {
                SidebarItem::Ref { id }
            })
        }
        "link" => {
            assert_keys(value, map, &["type", "href", "label"])?;
            Ok(SidebarItem::Link {
                href: required_string(value, map, "href")?,
                label: required_string(value, map, "label")?,
            })
        }
        "category" => {
            assert_keys(value, map, &["type", "label", "items", "collapsed"])?;
            let label = required_string(value, map, "label")?;
            let Some(Value::Array(items)) = map.get("items") else {
                return Err(SidebarError::invalid(value, "\"items\" must be an array"));
            };
            let collapsed = match map.get("collapsed") {
                None | Some(Value::Null) => false,
                Some(Value::Bool(collapsed)) => *collapsed,
                Some(_) => {
                    return Err(SidebarError::invalid(value, "\"collapsed\" must be a boolean"));
                }
            };
            Ok(SidebarItem::Category {
                label,
                items: normalize_items(items)?,
                collapsed,
            })
        }
        other => Err(SidebarError::UnknownType(other.to_owned())),
    }
}

/// Reject keys outside `allowed`.
fn assert_keys(value: &Value, map: &Map<String, Value>, allowed: &[&str]) -> Result<(), SidebarError> {
    match map.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(key) => Err(SidebarError::invalid(
            value,
            format!("unknown key \"{key}\""),
        )),
        None => Ok(()),
    }
}

fn required_string(
    value: &Value,
    map: &Map<String, Value>,
    key: &str,
) -> Result<String, SidebarError> {
    match map.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(SidebarError::invalid(
            value,
            format!("\"{key}\" must be a string"),
        )),
    }
}
