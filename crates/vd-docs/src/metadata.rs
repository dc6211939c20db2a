//! Per-document metadata.
//!
//! [`process_doc_metadata`] derives everything the site needs to know about
//! one document from its file, its version, and the plugin options:
//!
//! | Field       | Source                                                   |
//! |-------------|----------------------------------------------------------|
//! | id          | front matter `id`, else file stem, prefixed with its dir |
//! | slug        | `/` for the home page, else front matter `slug`, else id |
//! | permalink   | version path + slug                                      |
//! | title       | front matter `title`, else first `# heading`, else id    |
//! | description | front matter `description`, else first paragraph         |
//! | edit URL    | front matter `custom_edit_url`, else `edit_url` option   |

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use vd_config::Config;
use vd_storage::{DocFile, LastUpdateData};

use crate::DocsError;
use crate::front_matter::parse_front_matter;
use crate::url::{normalize_url, posix_path};
use crate::version::{VersionMetadata, qualified_doc_id};

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#[ \t]+(.+)$").unwrap());
static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap());
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap());
static EMPHASIS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*{1,3}|`").unwrap());

/// Edit link of a document.
///
/// Serializes to an absent field for `Default`, `null` when suppressed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum EditUrl {
    /// Nothing configured.
    #[default]
    Default,
    /// Explicitly hidden by the author.
    Suppressed,
    /// Explicit URL.
    Custom(String),
}

impl EditUrl {
    /// Whether nothing is configured.
    #[must_use]
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }

    /// URL to link to, if any.
    #[must_use]
    pub fn as_url(&self) -> Option<&str> {
        match self {
            Self::Custom(url) => Some(url),
            Self::Default | Self::Suppressed => None,
        }
    }
}

impl Serialize for EditUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Default | Self::Suppressed => serializer.serialize_none(),
            Self::Custom(url) => serializer.serialize_str(url),
        }
    }
}

/// An absent field deserializes through `#[serde(default)]` to
/// [`EditUrl::Default`]; a present one is `null` or a string.
impl<'de> Deserialize<'de> for EditUrl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<String>::deserialize(deserializer)? {
            Some(url) => Self::Custom(url),
            None => Self::Suppressed,
        })
    }
}

/// Link to a neighbouring document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DocNavLink {
    pub title: String,
    pub permalink: String,
}

/// Metadata of one document in one version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocMetadata {
    /// Version name.
    pub version: String,
    /// Id without version qualification (e.g., "guides/setup").
    pub unversioned_id: String,
    /// Id qualified with the version (e.g., "version-1.0.0/guides/setup").
    pub id: String,
    pub is_docs_home_page: bool,
    pub title: String,
    pub description: String,
    /// Site-aliased source path (e.g., "@site/docs/guides/setup.md").
    pub source: String,
    pub slug: String,
    pub permalink: String,
    #[serde(rename = "sidebar_label", skip_serializing_if = "Option::is_none")]
    pub sidebar_label: Option<String>,
    #[serde(skip_serializing_if = "EditUrl::is_default")]
    pub edit_url: EditUrl,
    #[serde(flatten)]
    pub last_update: LastUpdateData,
    /// Sidebar owning the doc.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<DocNavLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<DocNavLink>,
}

impl DocMetadata {
    /// Link to this doc for a neighbour's navigation.
    #[must_use]
    pub fn nav_link(&self) -> DocNavLink {
        DocNavLink {
            title: self.sidebar_label.clone().unwrap_or_else(|| self.title.clone()),
            permalink: self.permalink.clone(),
        }
    }
}

/// Build the metadata of one document.
///
/// Navigation fields (`sidebar`, `previous`, `next`) are left empty; they are
/// filled once the version's sidebars are known.
///
/// # Errors
///
/// Returns [`DocsError::FrontMatter`] for malformed front matter and
/// [`DocsError::InvalidId`] for a front matter id containing `/`.
pub fn process_doc_metadata(
    file: &DocFile,
    version: &VersionMetadata,
    config: &Config,
) -> Result<DocMetadata, DocsError> {
    let options = &config.docs.metadata;
    let (front_matter, body) = parse_front_matter(&file.source, &file.content)?;

    let source_path = Path::new(&file.source);
    let dir = source_path.parent().map(posix_path).unwrap_or_default();
    let stem = source_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let base_id = front_matter.id.clone().unwrap_or(stem);
    if base_id.contains('/') {
        return Err(DocsError::InvalidId {
            source_path: file.source.clone(),
            id: base_id,
        });
    }

    let unversioned_id = if dir.is_empty() {
        base_id.clone()
    } else {
        format!("{dir}/{base_id}")
    };
    let id = qualified_doc_id(&version.version_name, &unversioned_id);
    let is_docs_home_page = options.home_page_id.as_deref() == Some(unversioned_id.as_str());

    let slug = if is_docs_home_page {
        "/".to_owned()
    } else {
        match &front_matter.slug {
            Some(slug) if slug.starts_with('/') => slug.clone(),
            Some(slug) => normalize_url(&["/", &dir, slug]),
            None => normalize_url(&["/", &dir, &base_id]),
        }
    };
    let permalink = normalize_url(&[&version.version_path, &slug]);

    let title = front_matter
        .title
        .clone()
        .or_else(|| first_heading(body))
        .unwrap_or_else(|| base_id.clone());
    let description = front_matter
        .description
        .clone()
        .unwrap_or_else(|| excerpt(body));

    let docs_dir = version
        .docs_dir_path
        .strip_prefix(&config.site.site_dir)
        .map_or_else(|_| posix_path(&version.docs_dir_path), posix_path);

    let edit_url = match front_matter.custom_edit_url {
        EditUrl::Default => options
            .edit_url
            .as_deref()
            .map_or(EditUrl::Default, |base| {
                EditUrl::Custom(normalize_url(&[base, &docs_dir, &file.source]))
            }),
        explicit => explicit,
    };

    let last_update = LastUpdateData {
        last_updated_at: file
            .last_update
            .last_updated_at
            .filter(|_| options.show_last_update_time),
        last_updated_by: file
            .last_update
            .last_updated_by
            .clone()
            .filter(|_| options.show_last_update_author),
    };

    Ok(DocMetadata {
        version: version.version_name.clone(),
        unversioned_id,
        id,
        is_docs_home_page,
        title,
        description,
        source: normalize_url(&["@site", &docs_dir, &file.source]),
        slug,
        permalink,
        sidebar_label: front_matter.sidebar_label,
        edit_url,
        last_update,
        sidebar: None,
        previous: None,
        next: None,
    })
}

/// Text of the first level-one heading outside code fences.
#[must_use]
pub fn first_heading(body: &str) -> Option<String> {
    let mut in_fence = false;

    for line in body.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        let heading = HEADING_RE
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().trim_end_matches('#').trim_end())
            .filter(|t| !t.is_empty());
        if let Some(heading) = heading {
            return Some(heading.to_owned());
        }
    }

    None
}

/// Plain text of the first paragraph.
///
/// Headings, code fences, and `import`/`export` lines are skipped. Links keep
/// their text, images and inline markup are dropped.
#[must_use]
pub fn excerpt(body: &str) -> String {
    let mut paragraph = Vec::new();
    let mut in_fence = false;

    for line in body.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            if !paragraph.is_empty() {
                break;
            }
            continue;
        }
        if in_fence {
            continue;
        }
        if trimmed.is_empty() {
            if paragraph.is_empty() {
                continue;
            }
            break;
        }
        if paragraph.is_empty()
            && (trimmed.starts_with('#')
                || trimmed.starts_with("import ")
                || trimmed.starts_with("export "))
        {
            continue;
        }
        paragraph.push(trimmed);
    }

    let text = paragraph.join(" ");
    let text = IMAGE_RE.replace_all(&text, "");
    let text = LINK_RE.replace_all(&text, "$1");
    EMPHASIS_RE.replace_all(&text, "").trim().to_owned()
}
