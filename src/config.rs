//! Documentation configuration module.
//!
//! Handles loading, normalizing and validating `_markdocs/config.toml`. The
//! config names the attachments directory, the site and sidebar names, the
//! external links shown in the layout, the top-level navigation order, and
//! the folder renames applied to output paths.
//!
//! ## Config File Location
//!
//! ```text
//! docs/
//! ├── _markdocs/
//! │   ├── config.toml          # Required
//! │   └── favicon.png          # Optional (icon.png also accepted)
//! ├── Introduction.md
//! └── Guides/
//!     └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! attachmentsDir = "attachments"   # Relative to the docs root, or absolute
//! name = "Acme"                    # Home page title
//! sidebarName = "Acme Docs"        # Sidebar header
//! githubLink = "https://github.com/acme/acme"
//! twitterLink = "https://x.com/acme"
//! contactLink = "https://acme.dev/contact"
//!
//! # Top-level navigation. Entries starting with "---" are category headers.
//! pages = ["---Getting started---", "Introduction.md", "Guides"]
//!
//! [folders."Guides"]
//! slug = "guides"
//! pages = ["Installation.md", "Advanced"]
//!
//! [folders."Guides/Advanced"]
//! slug = "guides/advanced"
//! ```
//!
//! ## Unicode Keys
//!
//! Folder keys and page entries are stored in NFC. File systems disagree on
//! Unicode form (macOS hands out decomposed names), so a folder typed as
//! `Général` in the config must match the same folder read back from disk.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Config file name inside the reserved config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Prefix marking a navigation entry as a category header.
pub const CATEGORY_MARKER: &str = "---";

/// Fallback for `name` and `sidebarName` when the config leaves them out.
pub const DEFAULT_SITE_NAME: &str = "Documentation";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Config file not found: {0}")]
    Missing(PathBuf),
}

/// Documentation configuration loaded from `_markdocs/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct DocsConfig {
    /// Directory holding attached files, relative to the docs root or absolute.
    pub attachments_dir: String,
    /// Project name shown on the home page.
    pub name: Option<String>,
    /// Name shown at the top of the sidebar.
    pub sidebar_name: Option<String>,
    pub github_link: Option<String>,
    pub twitter_link: Option<String>,
    pub contact_link: Option<String>,
    /// Ordered top-level navigation: document paths and category headers.
    pub pages: Vec<String>,
    /// Original folder path → rename and ordering.
    pub folders: BTreeMap<String, FolderConfig>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            attachments_dir: ".".to_string(),
            name: None,
            sidebar_name: None,
            github_link: None,
            twitter_link: None,
            contact_link: None,
            pages: Vec::new(),
            folders: BTreeMap::new(),
        }
    }
}

/// Per-folder settings keyed by the folder's original relative path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FolderConfig {
    /// Replacement for the folder's path prefix in output paths.
    pub slug: String,
    /// Explicit page order inside the folder (documents or subfolders).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<String>,
}

impl DocsConfig {
    /// Rewrite folder keys and page entries into NFC.
    pub fn normalize(&mut self) {
        self.folders = std::mem::take(&mut self.folders)
            .into_iter()
            .map(|(key, mut folder)| {
                folder.pages = folder.pages.iter().map(|p| nfc(p)).collect();
                (nfc(&key), folder)
            })
            .collect();
        self.pages = self.pages.iter().map(|p| nfc(p)).collect();
    }

    /// Validate values that serde alone cannot check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (path, folder) in &self.folders {
            if folder.slug.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "folders.\"{path}\".slug must not be empty"
                )));
            }
            if folder.slug.starts_with('/') || folder.slug.ends_with('/') {
                return Err(ConfigError::Validation(format!(
                    "folders.\"{path}\".slug must not start or end with '/'"
                )));
            }
        }

        let links = [
            ("githubLink", &self.github_link),
            ("twitterLink", &self.twitter_link),
            ("contactLink", &self.contact_link),
        ];
        for (key, link) in links {
            if let Some(url) = link.as_deref().filter(|u| !u.is_empty())
                && !is_http_url(url)
            {
                return Err(ConfigError::Validation(format!(
                    "{key} must be an http(s) URL, got \"{url}\""
                )));
            }
        }
        Ok(())
    }

    /// Look up a folder by original path, in any Unicode form.
    pub fn folder(&self, path: &str) -> Option<&FolderConfig> {
        self.folders.get(&nfc(path))
    }

    /// Attachments directory resolved against the docs root.
    pub fn attachments_path(&self, root: &Path) -> PathBuf {
        let dir = Path::new(&self.attachments_dir);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            root.join(dir)
        }
    }

    pub fn display_name(&self) -> &str {
        non_empty(&self.name).unwrap_or(DEFAULT_SITE_NAME)
    }

    pub fn sidebar_display_name(&self) -> &str {
        non_empty(&self.sidebar_name).unwrap_or(DEFAULT_SITE_NAME)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn is_http_url(value: &str) -> bool {
    ["http://", "https://"]
        .iter()
        .any(|scheme| value.len() > scheme.len() && value.starts_with(scheme))
}

/// Canonical composed Unicode form of a string.
pub fn nfc(value: &str) -> String {
    value.nfc().collect()
}

/// Whether a navigation entry is a category header rather than a document.
pub fn is_category_marker(entry: &str) -> bool {
    entry.starts_with(CATEGORY_MARKER)
}

// =============================================================================
// Config loading
// =============================================================================

/// Load `config.toml` from the reserved config directory.
///
/// A missing file is an error: the build has nothing to order or rename
/// without it. Keys are normalized and values validated before returning.
pub fn load_config(config_dir: &Path) -> Result<DocsConfig, ConfigError> {
    let config_path = config_dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Err(ConfigError::Missing(config_path));
    }
    let content = fs::read_to_string(&config_path)?;
    parse_config(&content)
}

/// Parse, normalize and validate config text.
pub fn parse_config(content: &str) -> Result<DocsConfig, ConfigError> {
    let mut config: DocsConfig = toml::from_str(content)?;
    config.normalize();
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# markdocs configuration
# ======================
# Lives at <docs>/_markdocs/config.toml. Unknown keys cause an error.

# Directory holding attached images and videos.
# Relative paths resolve against the docs root.
attachmentsDir = "attachments"

# Project name shown on the home page.
name = "Documentation"

# Name shown at the top of the sidebar.
sidebarName = "Documentation"

# External links shown in the layout. Leave out the ones you don't need.
# githubLink = "https://github.com/you/project"
# twitterLink = "https://x.com/you"
# contactLink = "https://example.com/contact"

# ---------------------------------------------------------------------------
# Top-level navigation
# ---------------------------------------------------------------------------
# Document paths relative to the docs root, in display order.
# Entries starting with "---" are category headers and are kept verbatim.
pages = [
    "---Getting started---",
    "Introduction.md",
]

# ---------------------------------------------------------------------------
# Folders
# ---------------------------------------------------------------------------
# Keyed by the folder's original path. `slug` replaces that path prefix in
# the output tree; `pages` optionally fixes the order inside the folder
# (document file names or subfolder names). Nested folders use their full
# original path as key and their full output path as slug.
#
# [folders."Guides"]
# slug = "guides"
# pages = ["Installation.md", "Advanced"]
#
# [folders."Guides/Advanced"]
# slug = "guides/advanced"
"##
}
