//! Plugin options for versioned documentation content.
//!
//! Parses `docs-plugin.toml` files with serde and provides auto-discovery of
//! the file in parent directories. The file has two sections:
//!
//! ```toml
//! [site]
//! base_url = "/"
//!
//! [docs]
//! path = "docs"
//! sidebar_path = "sidebars.json"
//! route_base_path = "docs"
//! edit_url = "https://github.com/acme/handbook/edit/main"
//! ```
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.base_url`
//! - `docs.edit_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override site base URL.
    pub base_url: Option<String>,
    /// Override docs content directory.
    pub path: Option<PathBuf>,
    /// Override the versioning kill switch.
    pub disable_versioning: Option<bool>,
    /// Override whether the working copy is published as a version.
    pub include_current_version: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docs-plugin.toml";

/// Plugin id used when none is configured.
pub const DEFAULT_PLUGIN_ID: &str = "default";

/// Complete configuration: site-level settings plus plugin options.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site-level settings shared by all plugins.
    pub site: SiteConfig,
    /// Docs plugin options.
    pub docs: PluginOptions,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Site-level settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteConfig {
    /// URL prefix the whole site is served under.
    pub base_url: String,
    /// Site root directory. Versioned docs live below it.
    #[serde(skip)]
    pub site_dir: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "/".to_owned(),
            site_dir: PathBuf::from("."),
        }
    }
}

/// Options controlling the metadata computed for each document.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MetadataOptions {
    /// URL segment under the base URL where docs are served.
    pub route_base_path: String,
    /// Unversioned id of the document served at the version root.
    pub home_page_id: Option<String>,
    /// Prefix for "edit this page" links.
    pub edit_url: Option<String>,
    /// Expose the last update timestamp of each document.
    pub show_last_update_time: bool,
    /// Expose the last update author of each document.
    pub show_last_update_author: bool,
}

impl Default for MetadataOptions {
    fn default() -> Self {
        Self {
            route_base_path: "docs".to_owned(),
            home_page_id: None,
            edit_url: None,
            show_last_update_time: false,
            show_last_update_author: false,
        }
    }
}

/// Filesystem locations of the working copy docs.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathOptions {
    /// Directory holding the working copy documents.
    pub path: PathBuf,
    /// Sidebar definition file of the working copy. `None` means no sidebars.
    pub sidebar_path: Option<PathBuf>,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from("docs"),
            sidebar_path: None,
        }
    }
}

/// Content transform plugin reference.
///
/// Either a bare plugin name or a name with an options table.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TransformPlugin {
    /// Plugin referenced by name only.
    Name(String),
    /// Plugin with options.
    WithOptions {
        /// Plugin name.
        name: String,
        /// Options passed to the plugin.
        #[serde(default)]
        options: toml::Table,
    },
}

impl TransformPlugin {
    /// Plugin name regardless of form.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::WithOptions { name, .. } => name,
        }
    }
}

/// Options of the docs plugin.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PluginOptions {
    /// Plugin instance id.
    pub id: String,
    /// Metadata options.
    #[serde(flatten)]
    pub metadata: MetadataOptions,
    /// Path options.
    #[serde(flatten)]
    pub paths: PathOptions,
    /// Glob patterns (relative to a docs directory) selecting document files.
    pub include: Vec<String>,
    /// Component rendering the docs layout.
    pub doc_layout_component: String,
    /// Component rendering a single doc.
    pub doc_item_component: String,
    /// Markdown AST transforms.
    pub remark_plugins: Vec<TransformPlugin>,
    /// HTML AST transforms.
    pub rehype_plugins: Vec<String>,
    /// Admonition settings passed through to the renderer untouched.
    pub admonitions: Option<toml::Table>,
    /// Only serve the working copy, ignoring `versions.json`.
    pub disable_versioning: bool,
    /// Deprecated inverse of `include_current_version`.
    pub exclude_next_version_docs: Option<bool>,
    /// Publish the working copy as the `current` version.
    pub include_current_version: bool,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            id: DEFAULT_PLUGIN_ID.to_owned(),
            metadata: MetadataOptions::default(),
            paths: PathOptions::default(),
            include: vec!["**/*.md".to_owned(), "**/*.mdx".to_owned()],
            doc_layout_component: "@theme/DocPage".to_owned(),
            doc_item_component: "@theme/DocItem".to_owned(),
            remark_plugins: Vec::new(),
            rehype_plugins: Vec::new(),
            admonitions: None,
            disable_versioning: false,
            exclude_next_version_docs: None,
            include_current_version: true,
        }
    }
}

impl PluginOptions {
    /// Fold the deprecated `exclude_next_version_docs` flag into
    /// `include_current_version`.
    fn apply_legacy_options(&mut self) {
        if let Some(exclude) = self.exclude_next_version_docs.take() {
            tracing::warn!(
                plugin = %self.id,
                "exclude_next_version_docs is deprecated, use include_current_version instead"
            );
            self.include_current_version = !exclude;
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`docs.edit_url`").
        field: String,
        /// Error message (e.g., "${`EDIT_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `docs-plugin.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails, or
    /// the resulting options are invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Parse configuration from TOML content.
    ///
    /// Relative paths are resolved against `site_dir`, which also becomes
    /// the site root.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, env expansion, or validation fails.
    pub fn from_toml(content: &str, site_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.docs.apply_legacy_options();
        config.resolve_paths(site_dir);
        config.validate()?;
        Ok(config)
    }

    /// Create default config rooted at the given site directory.
    #[must_use]
    pub fn for_site(site_dir: &Path) -> Self {
        let mut config = Self::default();
        config.resolve_paths(site_dir);
        config
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(base_url) = &settings.base_url {
            self.site.base_url.clone_from(base_url);
        }
        if let Some(path) = &settings.path {
            self.docs.paths.path.clone_from(path);
        }
        if let Some(disable_versioning) = settings.disable_versioning {
            self.docs.disable_versioning = disable_versioning;
        }
        if let Some(include_current_version) = settings.include_current_version {
            self.docs.include_current_version = include_current_version;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_config_from(current)
    }

    fn discover_config_from(mut current: PathBuf) -> Option<PathBuf> {
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::for_site(&cwd)
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_toml(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        tracing::debug!(path = %path.display(), plugin = %config.docs.id, "Loaded plugin options");
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_docs()?;
        Ok(())
    }

    fn validate_site(&self) -> Result<(), ConfigError> {
        if !self.site.base_url.starts_with('/') {
            return Err(ConfigError::Validation(
                "site.base_url must start with /".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_docs(&self) -> Result<(), ConfigError> {
        let docs = &self.docs;
        require_non_empty(&docs.id, "docs.id")?;
        require_non_empty(&docs.paths.path.to_string_lossy(), "docs.path")?;

        if docs.include.is_empty() {
            return Err(ConfigError::Validation(
                "docs.include must list at least one pattern".to_owned(),
            ));
        }

        if let Some(ref home_page_id) = docs.metadata.home_page_id {
            require_non_empty(home_page_id, "docs.home_page_id")?;
        }

        if let Some(ref edit_url) = docs.metadata.edit_url {
            require_non_empty(edit_url, "docs.edit_url")?;
            require_http_url(edit_url, "docs.edit_url")?;
        }

        if docs.disable_versioning && !docs.include_current_version {
            return Err(ConfigError::Validation(
                "docs.disable_versioning requires docs.include_current_version, otherwise no version is published".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site.base_url = expand::expand_env(&self.site.base_url, "site.base_url")?;

        if let Some(ref url) = self.docs.metadata.edit_url {
            self.docs.metadata.edit_url = Some(expand::expand_env(url, "docs.edit_url")?);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on the site directory.
    fn resolve_paths(&mut self, site_dir: &Path) {
        self.site.site_dir = site_dir.to_path_buf();
        self.docs.paths.path = site_dir.join(&self.docs.paths.path);
        self.docs.paths.sidebar_path = self
            .docs
            .paths
            .sidebar_path
            .as_ref()
            .map(|p| site_dir.join(p));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::for_site(Path::new("/site"));
        assert_eq!(config.site.base_url, "/");
        assert_eq!(config.site.site_dir, PathBuf::from("/site"));
        assert_eq!(config.docs.id, "default");
        assert_eq!(config.docs.paths.path, PathBuf::from("/site/docs"));
        assert!(config.docs.paths.sidebar_path.is_none());
        assert_eq!(config.docs.metadata.route_base_path, "docs");
        assert!(config.docs.include_current_version);
        assert!(!config.docs.disable_versioning);
        assert_eq!(config.docs.include, vec!["**/*.md", "**/*.mdx"]);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = Config::from_toml("", Path::new("/site")).unwrap();
        assert_eq!(config.site.base_url, "/");
        assert_eq!(config.docs.paths.path, PathBuf::from("/site/docs"));
    }

    #[test]
    fn test_parse_full_docs_section() {
        let toml = r#"
[site]
base_url = "/handbook/"

[docs]
id = "handbook"
path = "content"
sidebar_path = "sidebars.json"
route_base_path = "guide"
home_page_id = "intro"
edit_url = "https://github.com/acme/handbook/edit/main"
show_last_update_time = true
show_last_update_author = true
include = ["**/*.md"]
doc_layout_component = "@theme/CustomDocPage"
doc_item_component = "@theme/CustomDocItem"
remark_plugins = ["remark-math", { name = "remark-emoji", options = { padSpaceAfter = true } }]
rehype_plugins = ["rehype-katex"]
disable_versioning = false
include_current_version = true

[docs.admonitions]
tag = ":::"
"#;
        let config = Config::from_toml(toml, Path::new("/site")).unwrap();
        let docs = &config.docs;

        assert_eq!(config.site.base_url, "/handbook/");
        assert_eq!(docs.id, "handbook");
        assert_eq!(docs.paths.path, PathBuf::from("/site/content"));
        assert_eq!(
            docs.paths.sidebar_path,
            Some(PathBuf::from("/site/sidebars.json"))
        );
        assert_eq!(docs.metadata.route_base_path, "guide");
        assert_eq!(docs.metadata.home_page_id.as_deref(), Some("intro"));
        assert_eq!(
            docs.metadata.edit_url.as_deref(),
            Some("https://github.com/acme/handbook/edit/main")
        );
        assert!(docs.metadata.show_last_update_time);
        assert!(docs.metadata.show_last_update_author);
        assert_eq!(docs.include, vec!["**/*.md"]);
        assert_eq!(docs.doc_layout_component, "@theme/CustomDocPage");
        assert_eq!(docs.doc_item_component, "@theme/CustomDocItem");
        assert_eq!(docs.remark_plugins.len(), 2);
        assert_eq!(docs.remark_plugins[0], TransformPlugin::Name("remark-math".to_owned()));
        assert_eq!(docs.remark_plugins[1].name(), "remark-emoji");
        assert_eq!(docs.rehype_plugins, vec!["rehype-katex"]);
        assert!(docs.admonitions.as_ref().unwrap().contains_key("tag"));
    }

    #[test]
    fn test_absolute_paths_kept() {
        let toml = r#"
[docs]
path = "/srv/docs"
sidebar_path = "/srv/sidebars.json"
"#;
        let config = Config::from_toml(toml, Path::new("/site")).unwrap();
        assert_eq!(config.docs.paths.path, PathBuf::from("/srv/docs"));
        assert_eq!(
            config.docs.paths.sidebar_path,
            Some(PathBuf::from("/srv/sidebars.json"))
        );
    }

    #[test]
    fn test_legacy_exclude_next_version_docs() {
        let toml = r"
[docs]
exclude_next_version_docs = true
";
        let config = Config::from_toml(toml, Path::new("/site")).unwrap();
        assert!(!config.docs.include_current_version);
        assert!(config.docs.exclude_next_version_docs.is_none());
    }

    #[test]
    fn test_legacy_exclude_next_version_docs_false() {
        let toml = r"
[docs]
exclude_next_version_docs = false
include_current_version = false
";
        let config = Config::from_toml(toml, Path::new("/site")).unwrap();
        assert!(config.docs.include_current_version);
    }

    #[test]
    fn test_expand_env_vars_edit_url() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("VD_CONFIG_EDIT_HOST", "git.example.com");
        }
        let toml = r#"
[docs]
edit_url = "https://${VD_CONFIG_EDIT_HOST}/edit"
"#;
        let config = Config::from_toml(toml, Path::new("/site")).unwrap();
        assert_eq!(
            config.docs.metadata.edit_url.as_deref(),
            Some("https://git.example.com/edit")
        );
        unsafe {
            std::env::remove_var("VD_CONFIG_EDIT_HOST");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("VD_CONFIG_MISSING_BASE");
        }
        let toml = r#"
[site]
base_url = "${VD_CONFIG_MISSING_BASE}"
"#;
        let err = Config::from_toml(toml, Path::new("/site")).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("site.base_url"));
    }

    #[test]
    fn test_parse_error_reported() {
        let err = Config::from_toml("[docs\npath = 1", Path::new("/site")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::for_site(Path::new("/site"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_id() {
        let mut config = Config::for_site(Path::new("/site"));
        config.docs.id = String::new();
        assert_validation_error(&config, &["docs.id", "empty"]);
    }

    #[test]
    fn test_validate_empty_path() {
        let mut config = Config::for_site(Path::new("/site"));
        config.docs.paths.path = PathBuf::new();
        assert_validation_error(&config, &["docs.path", "empty"]);
    }

    #[test]
    fn test_validate_base_url_without_slash() {
        let mut config = Config::for_site(Path::new("/site"));
        config.site.base_url = "handbook".to_owned();
        assert_validation_error(&config, &["site.base_url"]);
    }

    #[test]
    fn test_validate_edit_url_invalid_scheme() {
        let mut config = Config::for_site(Path::new("/site"));
        config.docs.metadata.edit_url = Some("ftp://example.com".to_owned());
        assert_validation_error(&config, &["edit_url", "http"]);
    }

    #[test]
    fn test_validate_empty_include() {
        let mut config = Config::for_site(Path::new("/site"));
        config.docs.include.clear();
        assert_validation_error(&config, &["docs.include"]);
    }

    #[test]
    fn test_validate_no_version_published() {
        let mut config = Config::for_site(Path::new("/site"));
        config.docs.disable_versioning = true;
        config.docs.include_current_version = false;
        assert_validation_error(&config, &["disable_versioning", "include_current_version"]);
    }

    #[test]
    fn test_validate_empty_home_page_id() {
        let mut config = Config::for_site(Path::new("/site"));
        config.docs.metadata.home_page_id = Some(String::new());
        assert_validation_error(&config, &["home_page_id"]);
    }

    // CLI settings tests

    #[test]
    fn test_apply_cli_settings_multiple() {
        let mut config = Config::for_site(Path::new("/site"));
        config.apply_cli_settings(&CliSettings {
            base_url: Some("/preview/".to_owned()),
            path: Some(PathBuf::from("/tmp/docs")),
            disable_versioning: Some(true),
            include_current_version: None,
        });
        assert_eq!(config.site.base_url, "/preview/");
        assert_eq!(config.docs.paths.path, PathBuf::from("/tmp/docs"));
        assert!(config.docs.disable_versioning);
        assert!(config.docs.include_current_version);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::for_site(Path::new("/site"));
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.site.base_url, "/");
        assert!(!config.docs.disable_versioning);
    }

    // Discovery and loading tests

    #[test]
    fn test_discover_config_in_parent() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(temp.path().join(CONFIG_FILENAME), "").unwrap();

        let found = Config::discover_config_from(nested).unwrap();
        assert_eq!(found, temp.path().join(CONFIG_FILENAME));
    }

    #[test]
    fn test_load_explicit_path() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[docs]\nroute_base_path = \"\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.config_path, Some(path));
        assert_eq!(config.site.site_dir, temp.path());
        assert_eq!(config.docs.metadata.route_base_path, "");
    }

    #[test]
    fn test_load_explicit_path_missing() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("missing.toml");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_applies_cli_settings_and_revalidates() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[docs]\ndisable_versioning = true\n").unwrap();

        let settings = CliSettings {
            include_current_version: Some(false),
            ..CliSettings::default()
        };
        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
