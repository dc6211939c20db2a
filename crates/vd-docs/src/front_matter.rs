//! YAML front matter at the top of a document.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::DocsError;
use crate::metadata::EditUrl;

static FRONT_MATTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---\r?\n(?:(.*?)\r?\n)?---[ \t]*(?:\r?\n|\z)").unwrap()
});

/// Fields a document may set in its front matter.
///
/// Unknown keys are ignored; they belong to content transforms. Text fields
/// accept any YAML scalar, so `title: 2021` reads as `"2021"`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    /// Overrides the id derived from the file name.
    #[serde(deserialize_with = "scalar_text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub description: Option<String>,
    /// Absolute, or relative to the document's directory.
    #[serde(deserialize_with = "scalar_text")]
    pub slug: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub sidebar_label: Option<String>,
    /// `null` hides the edit link, a string replaces it.
    pub custom_edit_url: EditUrl,
}

/// Read a string, number, or boolean as text. Sequences and mappings are
/// rejected.
fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::Null => Ok(None),
        serde_yaml::Value::String(s) => Ok(Some(s)),
        serde_yaml::Value::Number(n) => Ok(Some(n.to_string())),
        serde_yaml::Value::Bool(b) => Ok(Some(b.to_string())),
        _ => Err(D::Error::custom("expected a string, number, or boolean")),
    }
}

/// Split `content` into front matter and body.
///
/// Content without a leading `---` block has default front matter and is
/// returned whole.
///
/// # Errors
///
/// Returns [`DocsError::FrontMatter`] if the block is not a YAML mapping of
/// known field types.
pub fn parse_front_matter<'a>(
    source_path: &str,
    content: &'a str,
) -> Result<(FrontMatter, &'a str), DocsError> {
    let Some(captures) = FRONT_MATTER_RE.captures(content) else {
        return Ok((FrontMatter::default(), content));
    };

    let body = &content[captures.get(0).map_or(0, |m| m.end())..];
    let yaml = captures.get(1).map_or("", |m| m.as_str()).trim();
    if yaml.is_empty() {
        return Ok((FrontMatter::default(), body));
    }

    let front_matter = serde_yaml::from_str(yaml).map_err(|e| DocsError::FrontMatter {
        source_path: source_path.to_owned(),
        message: e.to_string(),
    })?;

    Ok((front_matter, body))
}
