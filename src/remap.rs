//! Output path remapping through configured folder slugs.
//!
//! A relative path is checked against the configured folders from its longest
//! prefix down to its first segment. Every prefix found in the config is
//! replaced by its slug, and later (shorter) prefixes are matched against the
//! already rewritten path:
//!
//! ```text
//! folders: "Guides" → "guides", "Guides/Avancé" → "guides/advanced"
//!
//! Guides/Avancé/Tuning.md
//!   prefix "Guides/Avancé/Tuning.md"  no
//!   prefix "Guides/Avancé"            yes → guides/advanced/Tuning.md
//!   prefix "Guides"                   no longer a prefix, skipped
//! ```
//!
//! Prefixes match whole segments only: `Guide` never matches `Guides/x.md`.

use crate::config::{FolderConfig, nfc};
use std::collections::BTreeMap;

/// Every prefix of a `/`-separated path, longest first.
///
/// `a/b/c.md` → `["a/b/c.md", "a/b", "a"]`
pub fn path_prefixes(path: &str) -> Vec<String> {
    let segments: Vec<&str> = path.split('/').collect();
    (1..=segments.len())
        .rev()
        .map(|n| segments[..n].join("/"))
        .collect()
}

/// Rewrite `path` through the folder mapping. Keys must already be NFC.
pub fn remap_path(path: &str, folders: &BTreeMap<String, FolderConfig>) -> String {
    let original = nfc(path);
    let mut current = original.clone();

    for prefix in path_prefixes(&original) {
        let Some(folder) = folders.get(&prefix) else {
            continue;
        };
        if let Some(rest) = strip_segment_prefix(&current, &prefix) {
            current = format!("{}{rest}", folder.slug);
        }
    }
    current
}

/// Remove `prefix` from the front of `path` if it ends on a segment boundary.
///
/// The returned suffix keeps its leading `/`.
fn strip_segment_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    (rest.is_empty() || rest.starts_with('/')).then_some(rest)
}
