//! Centralized filename handling for documents and attachments.
//!
//! Every place that looks at a file suffix goes through this module, so the
//! set of supported attachment types lives in exactly one enum:
//!
//! - [`AttachmentKind::classify`] turns an extension into a kind
//! - [`public_name`] derives the name an attachment is published under
//! - [`strip_doc_extension`] / [`document_title`] handle Markdown filenames
//!
//! ## Public Names
//!
//! With renaming off, an attachment keeps its file name. With renaming on, the
//! name becomes the first 16 hex digits of the SHA-256 of the original file
//! name, with the original extension kept:
//!
//! - `diagram.png` → `diagram.png` (renaming off)
//! - `screens/diagram.png` → `a1b2c3d4e5f60718.png` (renaming on)
//!
//! The digest covers the file name only, never the directory. Two references to
//! the same file collapse into one published attachment, and two different
//! files that share a name still collide, which the generate stage reports.

use sha2::{Digest, Sha256};
use std::path::Path;

/// Extensions accepted by Obsidian `![[...]]` embeds.
pub const EMBED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Supported attachment kinds, classified by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// Rendered as Markdown image syntax.
    Image,
    /// Rendered as a self-closing `<video>` element.
    Video,
    /// Anything else. Still copied when referenced with inline image syntax.
    Other,
}

impl AttachmentKind {
    /// Classify a file name or path by its (case-insensitive) extension.
    pub fn classify(name: &str) -> Self {
        match extension_of(name).as_deref() {
            Some("png" | "jpg" | "jpeg" | "gif" | "webp" | "svg" | "avif") => Self::Image,
            Some("mp4") => Self::Video,
            _ => Self::Other,
        }
    }

    /// Whether an Obsidian embed may point at this file.
    pub fn is_embeddable(name: &str) -> bool {
        extension_of(name)
            .map(|ext| EMBED_IMAGE_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }
}

/// Lower-cased extension without the dot, if any.
fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
}

/// Name under which an attachment is published.
///
/// `source` is the reference as written in the document (possibly with
/// directories). See the module docs for the renaming scheme.
pub fn public_name(source: &str, rename: bool) -> String {
    let file_name = Path::new(source)
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string());

    if !rename {
        return file_name;
    }

    let digest = Sha256::digest(file_name.as_bytes());
    let hex: String = digest.iter().take(8).map(|b| format!("{b:02x}")).collect();
    match Path::new(&file_name).extension() {
        Some(ext) => format!("{hex}.{}", ext.to_string_lossy()),
        None => hex,
    }
}

/// Remove a trailing `.md` or `.mdx` from a path or file name.
///
/// - `guide/setup.md` → `guide/setup`
/// - `intro.mdx` → `intro`
/// - `notes.txt` → `notes.txt`
pub fn strip_doc_extension(path: &str) -> &str {
    strip_suffix_ignore_case(path, ".md")
        .or_else(|| strip_suffix_ignore_case(path, ".mdx"))
        .unwrap_or(path)
}

/// `strip_suffix` with an ASCII case-insensitive suffix: `README.MD` → `README`.
fn strip_suffix_ignore_case<'a>(value: &'a str, suffix: &str) -> Option<&'a str> {
    let split = value.len().checked_sub(suffix.len())?;
    if !value.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = value.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

/// Document title: the file stem of its source path.
pub fn document_title(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Force the site framework's document extension onto a file name.
///
/// - `setup.md` → `setup.mdx`
/// - `setup` → `setup.mdx`
pub fn with_mdx_extension(file_name: &str) -> String {
    let stem = strip_doc_extension(file_name);
    format!("{stem}.mdx")
}
