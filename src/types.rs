//! Shared types passed between pipeline stages.
//!
//! Documents and attachments are produced by the process stage and consumed
//! by the generate stage; folder descriptors and navigation files are built
//! and written by the generate stage.

use crate::naming::AttachmentKind;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// An attached file discovered while converting a document.
///
/// The first document to reference a public name owns it; later references
/// with a different source path are conflicts.
#[derive(Debug, Clone, Serialize)]
pub struct Attachment {
    /// Where the file was read from.
    pub source_path: PathBuf,
    /// File name under the public attachments directory.
    pub public_name: String,
    pub alt: String,
    #[serde(skip)]
    pub kind: AttachmentKind,
    #[serde(skip)]
    pub content: Vec<u8>,
}

/// A non-fatal problem, tagged with what it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    /// Relative document path, attachment name, or file the warning is about.
    pub context: String,
    pub message: String,
}

impl Warning {
    pub fn new(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.context, self.message)
    }
}

/// A source document after conversion.
#[derive(Debug, Clone)]
pub struct Document {
    pub source_path: PathBuf,
    /// Path segments relative to the docs root, as found on disk (NFC).
    pub parts: Vec<String>,
    /// Filename stem of the source file.
    pub title: String,
    pub metadata: BTreeMap<String, String>,
    pub body: String,
    pub imports: Vec<String>,
    pub warnings: Vec<String>,
}

impl Document {
    /// Relative source path joined with `/`.
    pub fn relative_path(&self) -> String {
        self.parts.join("/")
    }
}

/// One output directory holding at least one written document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderDescriptor {
    /// Output directory, relative to the documents root, `/`-joined.
    pub path: String,
    /// Original folder path relative to the docs root, `/`-joined (NFC).
    pub original_path: String,
    /// Last segment of the original folder path.
    pub title: String,
}

/// Contents of a `meta.json` navigation file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub pages: Vec<String>,
}

/// Marker telling the site framework to use its default page order.
pub const DEFAULT_ORDER_MARKER: &str = "...";
