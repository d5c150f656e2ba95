//! Source discovery.
//!
//! Stage 1 of the build pipeline. Loads the configuration and collects every
//! Markdown document under the docs root, producing a [`SourceTree`] that the
//! process stage converts.
//!
//! ## Directory Structure
//!
//! ```text
//! docs/                            # Docs root (--source)
//! ├── _markdocs/
//! │   ├── config.toml              # Required
//! │   └── favicon.png              # Optional
//! ├── attachments/                 # attachmentsDir (must exist)
//! │   └── diagram.png
//! ├── Introduction.md
//! ├── .obsidian/                   # Hidden: ignored
//! └── Guides/
//!     ├── Installation.md
//!     └── Advanced/
//!         └── Tuning.md
//! ```
//!
//! ## Validation
//!
//! Fatal: the docs root or attachments directory is missing, or the config
//! cannot be read or parsed. A document that cannot be read as UTF-8 is
//! skipped with a warning.

use crate::config::{self, DocsConfig, nfc};
use crate::naming;
use crate::types::Warning;
use crate::walk::{self, CONFIG_DIR, WalkOptions};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Directory not found: {0}")]
    MissingDirectory(PathBuf),
}

/// A Markdown file found under the docs root, not yet converted.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    /// Path segments relative to the docs root (NFC).
    pub parts: Vec<String>,
    /// Filename stem.
    pub title: String,
    pub content: String,
}

impl SourceDocument {
    pub fn relative_path(&self) -> String {
        self.parts.join("/")
    }
}

/// Everything the process stage needs.
#[derive(Debug)]
pub struct SourceTree {
    pub root: PathBuf,
    pub config: DocsConfig,
    pub attachments_dir: PathBuf,
    /// Sorted by relative path.
    pub documents: Vec<SourceDocument>,
    pub warnings: Vec<Warning>,
}

impl SourceTree {
    pub fn config_dir(&self) -> PathBuf {
        self.root.join(CONFIG_DIR)
    }
}

pub fn scan(root: &Path) -> Result<SourceTree, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::MissingDirectory(root.to_path_buf()));
    }

    let config = config::load_config(&root.join(CONFIG_DIR))?;

    let attachments_dir = config.attachments_path(root);
    if !attachments_dir.is_dir() {
        return Err(ScanError::MissingDirectory(attachments_dir));
    }

    let options = WalkOptions {
        exclude_dependencies: true,
        exclude_hidden: true,
    };
    let mut md_files: Vec<PathBuf> = walk::walk_recursive(root, options)?
        .into_iter()
        .filter(|p| is_markdown(p))
        .collect();
    md_files.sort();

    let mut documents = Vec::new();
    let mut warnings = Vec::new();
    for path in md_files {
        let parts = relative_parts(root, &path);
        match fs::read_to_string(&path) {
            Ok(content) => documents.push(SourceDocument {
                title: naming::document_title(&path),
                path,
                parts,
                content,
            }),
            Err(e) => warnings.push(Warning::new(
                parts.join("/"),
                format!("unable to read the document: {e}"),
            )),
        }
    }

    Ok(SourceTree {
        root: root.to_path_buf(),
        config,
        attachments_dir,
        documents,
        warnings,
    })
}

fn is_markdown(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("md"))
            .unwrap_or(false)
}

/// Path segments of `path` relative to `root`, each in NFC.
fn relative_parts(root: &Path, path: &Path) -> Vec<String> {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| nfc(&c.as_os_str().to_string_lossy()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn scan_finds_all_documents() {
        let tmp = setup_fixtures();
        let tree = scan(tmp.path()).unwrap();

        assert_eq!(
            document_paths(&tree),
            vec![
                "Guides/Advanced/Tuning.md",
                "Guides/Installation.md",
                "Introduction.md",
                "Reference/Glossary.md",
            ]
        );
    }

    #[test]
    fn hidden_and_dependency_files_skipped() {
        let tmp = setup_fixtures();
        fs::create_dir_all(tmp.path().join(".obsidian")).unwrap();
        fs::write(tmp.path().join(".obsidian/notes.md"), "x").unwrap();
        fs::create_dir_all(tmp.path().join("node_modules/pkg")).unwrap();
        fs::write(tmp.path().join("node_modules/pkg/README.md"), "x").unwrap();

        let tree = scan(tmp.path()).unwrap();
        let paths = document_paths(&tree);
        assert!(!paths.iter().any(|p| p.contains(".obsidian")));
        assert!(!paths.iter().any(|p| p.contains("node_modules")));
    }

    #[test]
    fn config_dir_markdown_never_scanned() {
        let tmp = setup_fixtures();
        fs::write(tmp.path().join(CONFIG_DIR).join("README.md"), "x").unwrap();

        let tree = scan(tmp.path()).unwrap();
        assert!(!document_paths(&tree).iter().any(|p| p.starts_with(CONFIG_DIR)));
    }

    #[test]
    fn non_markdown_files_ignored() {
        let tmp = setup_fixtures();
        fs::write(tmp.path().join("notes.txt"), "x").unwrap();

        let tree = scan(tmp.path()).unwrap();
        assert!(!document_paths(&tree).iter().any(|p| p.ends_with(".txt")));
    }

    #[test]
    fn document_title_and_parts() {
        let tmp = setup_fixtures();
        let tree = scan(tmp.path()).unwrap();

        let doc = find_source(&tree, "Guides/Installation.md");
        assert_eq!(doc.title, "Installation");
        assert_eq!(doc.parts, vec!["Guides", "Installation.md"]);
        assert!(doc.content.contains("name: installation"));
    }

    #[test]
    fn attachments_dir_resolved_from_config() {
        let tmp = setup_fixtures();
        let tree = scan(tmp.path()).unwrap();
        assert_eq!(tree.attachments_dir, tmp.path().join("attachments"));
    }

    #[test]
    fn missing_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = scan(&tmp.path().join("nope"));
        assert!(matches!(result, Err(ScanError::MissingDirectory(_))));
    }

    #[test]
    fn missing_config_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.md"), "x").unwrap();
        let result = scan(tmp.path());
        assert!(matches!(result, Err(ScanError::Config(_))));
    }

    #[test]
    fn missing_attachments_dir_is_error() {
        let tmp = setup_fixtures();
        fs::remove_dir_all(tmp.path().join("attachments")).unwrap();
        let result = scan(tmp.path());
        assert!(matches!(result, Err(ScanError::MissingDirectory(_))));
    }

    #[test]
    fn unreadable_document_is_warning() {
        let tmp = setup_fixtures();
        fs::write(tmp.path().join("binary.md"), [0xff, 0xfe, 0x00]).unwrap();

        let tree = scan(tmp.path()).unwrap();
        assert_eq!(tree.warnings.len(), 1);
        assert_eq!(tree.warnings[0].context, "binary.md");
        assert!(!document_paths(&tree).contains(&"binary.md".to_string()));
    }

    #[test]
    fn decomposed_file_names_normalized() {
        let tmp = setup_fixtures();
        fs::write(tmp.path().join("Re\u{301}sume\u{301}.md"), "x").unwrap();

        let tree = scan(tmp.path()).unwrap();
        assert!(document_paths(&tree).contains(&"R\u{e9}sum\u{e9}.md".to_string()));
    }
}
