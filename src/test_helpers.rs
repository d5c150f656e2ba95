//! Shared test utilities for the markdocs test suite.
//!
//! Provides fixture setup, lookup helpers that panic with the available
//! choices on a miss, and readers for generated output.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let (tree, processed) = scan_and_process(tmp.path());
//!
//! let doc = find_document(&processed.documents, "Guides/Installation.md");
//! assert_eq!(doc.metadata["name"], "installation");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::pipeline::build_convert_options;
use crate::process::{self, ProcessResult};
use crate::scan::{self, SourceDocument, SourceTree};
use crate::types::Document;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/docs/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/docs");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

/// Copy the app templates from `fixtures/app/` into `dir`.
pub fn setup_app_templates(dir: &Path) {
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/app");
    std::fs::create_dir_all(dir).unwrap();
    copy_dir_recursive(&fixtures, dir).unwrap();
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Run stages 1 and 2 with build settings. Panics on a scan error.
pub fn scan_and_process(root: &Path) -> (SourceTree, ProcessResult) {
    let tree = scan::scan(root).unwrap();
    let processed = process::process(&tree, &build_convert_options(&tree), None);
    (tree, processed)
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find a scanned document by relative path. Panics if not found.
pub fn find_source<'a>(tree: &'a SourceTree, path: &str) -> &'a SourceDocument {
    tree.documents
        .iter()
        .find(|d| d.relative_path() == path)
        .unwrap_or_else(|| {
            let paths = document_paths(tree);
            panic!("document '{path}' not found. Available: {paths:?}")
        })
}

/// Find a converted document by relative path. Panics if not found.
pub fn find_document<'a>(documents: &'a [Document], path: &str) -> &'a Document {
    documents
        .iter()
        .find(|d| d.relative_path() == path)
        .unwrap_or_else(|| {
            let paths: Vec<String> = documents.iter().map(|d| d.relative_path()).collect();
            panic!("document '{path}' not found. Available: {paths:?}")
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All scanned document paths in scan order.
pub fn document_paths(tree: &SourceTree) -> Vec<String> {
    tree.documents.iter().map(|d| d.relative_path()).collect()
}
