//! Recursive file enumeration under a documentation root.
//!
//! The walker yields files depth-first in directory-entry order (not sorted).
//! Two directory names are special: the reserved config directory
//! ([`CONFIG_DIR`]) is always reported as a leaf and never descended into,
//! and the dependency directory ([`DEPENDENCY_DIR`]) gets the same treatment
//! when dependencies are excluded. Hidden entries are dropped entirely when
//! hidden exclusion is on.
//!
//! ```text
//! docs/
//! ├── _markdocs/          → listed, not traversed
//! ├── node_modules/       → listed, not traversed (exclude_dependencies)
//! ├── .obsidian/          → skipped (exclude_hidden)
//! ├── intro.md            → listed
//! └── guide/
//!     └── setup.md        → listed
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Reserved directory holding `config.toml` and the favicon.
pub const CONFIG_DIR: &str = "_markdocs";

/// Conventional package-manager dependency directory.
pub const DEPENDENCY_DIR: &str = "node_modules";

/// Switches controlling which entries the walker skips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOptions {
    pub exclude_dependencies: bool,
    pub exclude_hidden: bool,
}

/// List every file under `root`, applying the exclusion rules in [`WalkOptions`].
///
/// Fails if `root` (or any traversed directory) cannot be read.
pub fn walk_recursive(root: &Path, options: WalkOptions) -> io::Result<Vec<PathBuf>> {
    // Surface an unreadable root before walking so the error names it directly.
    fs::read_dir(root)?;

    let mut results = Vec::new();
    let mut entries = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .into_iter();

    while let Some(entry) = entries.next() {
        let entry = entry.map_err(io::Error::from)?;
        let is_dir = entry.file_type().is_dir();
        let name = entry.file_name().to_string_lossy().into_owned();

        if is_dir
            && (name == CONFIG_DIR || (options.exclude_dependencies && name == DEPENDENCY_DIR))
        {
            results.push(entry.into_path());
            entries.skip_current_dir();
            continue;
        }

        if options.exclude_hidden && name.starts_with('.') {
            if is_dir {
                entries.skip_current_dir();
            }
            continue;
        }

        if !is_dir {
            results.push(entry.into_path());
        }
    }

    Ok(results)
}
