//! Documentation tree generation.
//!
//! Stage 3 of the build pipeline. Takes the converted documents and writes
//! the site framework's content tree.
//!
//! ## Output Structure
//!
//! ```text
//! site/
//! ├── content/docs/                 # Cleared on every build
//! │   ├── meta.json                 # Root navigation
//! │   ├── intro.mdx                 # Named from front-matter `name`
//! │   └── guides/                   # Folder renamed through its slug
//! │       ├── meta.json             # Folder title + page order
//! │       └── installation.mdx
//! ├── public/attached-files/        # Cleared on every build
//! │   └── 3f2a…e1.png
//! └── app/
//!     ├── icon.png                  # From _markdocs/favicon.png or icon.png
//!     ├── layout.config.jsx         # PROJECT_NAME and links substituted
//!     └── (home)/[[...slug]]/page.tsx
//! ```
//!
//! ## Documents
//!
//! Each document's source path is rewritten through the configured folder
//! slugs ([`crate::remap`]). Its file name becomes the front-matter `name`
//! (falling back to the source name with a warning), `name` is dropped from
//! the metadata and `title` is set to the source file stem. The written file
//! is the metadata block, a blank line, the component imports, and the body.
//! Documents with an empty body are not written.
//!
//! ## Navigation
//!
//! The root `meta.json` lists the configured top-level pages, each resolved
//! to the output path of the document it names. Every output folder holding
//! a document gets its own `meta.json` with the folder's original name as
//! title and its configured page order, or `["..."]` for the framework
//! default.
//!
//! ## App Files
//!
//! Template edits replace the first line containing a known declaration
//! (`const PROJECT_NAME = ` etc.) with the configured value. A missing file
//! or line is a warning: the app directory may come from an older template.

use crate::config::{DocsConfig, is_category_marker, nfc};
use crate::naming;
use crate::pipeline::{BuildEvent, emit};
use crate::process::ProcessResult;
use crate::remap::remap_path;
use crate::types::{
    Attachment, DEFAULT_ORDER_MARKER, Document, FolderDescriptor, NavMeta, Warning,
};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Documents directory, relative to the site root.
pub const DOCS_DIR: &str = "content/docs";
/// Published attachments directory, relative to the site root.
pub const ATTACHMENTS_DIR: &str = "public/attached-files";
pub const APP_DIR: &str = "app";
/// URL prefix under which [`ATTACHMENTS_DIR`] is served.
pub const PUBLIC_ATTACHMENTS_PREFIX: &str = "/attached-files/";
pub const META_FILE: &str = "meta.json";

/// Favicon sources inside the config directory, in priority order.
const FAVICON_CANDIDATES: [&str; 2] = ["favicon.png", "icon.png"];
const APP_ICON: &str = "icon.png";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where each kind of output lands under the site root.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub docs_dir: PathBuf,
    pub attachments_dir: PathBuf,
    pub app_dir: PathBuf,
}

impl OutputLayout {
    pub fn new(site_root: &Path) -> Self {
        Self {
            docs_dir: site_root.join(DOCS_DIR),
            attachments_dir: site_root.join(ATTACHMENTS_DIR),
            app_dir: site_root.join(APP_DIR),
        }
    }
}

/// A document with its output location decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedDocument {
    /// Source path relative to the docs root.
    pub source: String,
    /// Output path relative to the documents directory, ending in `.mdx`.
    pub output: String,
    pub folder: Option<FolderDescriptor>,
    /// File content, or `None` when there is nothing to write.
    pub content: Option<String>,
}

impl PlannedDocument {
    fn slug(&self) -> &str {
        naming::strip_doc_extension(&self.output)
    }
}

#[derive(Debug, Default)]
pub struct GenerateResult {
    pub documents_written: usize,
    pub attachments_copied: usize,
    pub folders: Vec<FolderDescriptor>,
    pub warnings: Vec<Warning>,
}

/// Write the whole documentation tree.
pub fn generate(
    processed: &ProcessResult,
    config: &DocsConfig,
    config_dir: &Path,
    layout: &OutputLayout,
    events: Option<&Sender<BuildEvent>>,
) -> Result<GenerateResult, GenerateError> {
    let mut warnings = Vec::new();
    let mut warn = |warning: Warning| {
        emit(events, BuildEvent::Warning(warning.clone()));
        warnings.push(warning);
    };

    let mut planned = Vec::with_capacity(processed.documents.len());
    for document in &processed.documents {
        let (plan, plan_warnings) = plan_document(document, config);
        plan_warnings.into_iter().for_each(&mut warn);
        planned.push(plan);
    }

    let mut skipped = drop_output_collisions(&mut planned);
    for plan in planned.iter().filter(|p| p.content.is_none()) {
        if !skipped.iter().any(|w| w.context == plan.source) {
            skipped.push(Warning::new(&plan.source, "empty document, not written"));
        }
    }
    for warning in skipped {
        emit(
            events,
            BuildEvent::DocumentSkipped {
                source: warning.context.clone(),
                reason: warning.message.clone(),
            },
        );
        warnings.push(warning);
    }

    reset_dir(&layout.docs_dir)?;
    let documents_written = write_documents(&planned, &layout.docs_dir, events)?;
    let written: Vec<&PlannedDocument> = planned.iter().filter(|p| p.content.is_some()).collect();
    let folders = collect_folders(&written);

    reset_dir(&layout.attachments_dir)?;
    let attachments_copied =
        copy_attachments(&processed.attachments, &layout.attachments_dir, events)?;

    let root = root_navigation(config, &written);
    write_meta(&layout.docs_dir.join(META_FILE), &root)?;
    emit(
        events,
        BuildEvent::MetadataWritten {
            path: META_FILE.to_string(),
        },
    );

    for folder in &folders {
        let (meta, meta_warnings) = folder_navigation(folder, config, &written, &folders);
        let relative = format!("{}/{META_FILE}", folder.path);
        write_meta(&layout.docs_dir.join(&relative), &meta)?;
        emit(events, BuildEvent::MetadataWritten { path: relative });
        for warning in meta_warnings {
            emit(events, BuildEvent::Warning(warning.clone()));
            warnings.push(warning);
        }
    }

    install_favicon(config_dir, &layout.app_dir)?;

    for edit in template_edits(config) {
        if let Err(message) = apply_template_edit(&layout.app_dir, &edit) {
            let warning = Warning::new(format!("{APP_DIR}/{}", edit.file.display()), message);
            emit(events, BuildEvent::Warning(warning.clone()));
            warnings.push(warning);
        }
    }

    Ok(GenerateResult {
        documents_written,
        attachments_copied,
        folders,
        warnings,
    })
}

// ============================================================================
// Document planning
// ============================================================================

/// Decide where a document goes and what gets written.
pub fn plan_document(document: &Document, config: &DocsConfig) -> (PlannedDocument, Vec<Warning>) {
    let source = document.relative_path();
    let mut warnings = Vec::new();

    let mut output_parts: Vec<String> = remap_path(&source, &config.folders)
        .split('/')
        .map(str::to_string)
        .collect();

    let mut metadata = document.metadata.clone();
    let name = metadata
        .remove("name")
        .map(|n| file_safe_name(&n))
        .filter(|n| !n.is_empty());
    if let Some(last) = output_parts.last_mut() {
        *last = match name {
            Some(name) => naming::with_mdx_extension(&name),
            None => {
                warnings.push(Warning::new(
                    &source,
                    "no name in front matter, file name used",
                ));
                naming::with_mdx_extension(last)
            }
        };
    }
    metadata.insert("title".to_string(), yaml_scalar(&document.title));

    let content = (!document.body.trim().is_empty())
        .then(|| serialize_document(&metadata, &document.imports, &document.body));

    let plan = PlannedDocument {
        folder: folder_descriptor(&document.parts, &output_parts),
        output: output_parts.join("/"),
        source,
        content,
    };
    (plan, warnings)
}

/// Front matter, imports and body, in the layout the site framework reads.
pub fn serialize_document(
    metadata: &BTreeMap<String, String>,
    imports: &[String],
    body: &str,
) -> String {
    let mut out = String::from("---\n");
    for (key, value) in metadata {
        out.push_str(&format!("{key}: {value}\n"));
    }
    out.push_str("---\n\n");
    if !imports.is_empty() {
        out.push_str(&imports.join("\n"));
        out.push_str("\n\n");
    }
    out.push_str(body);
    out
}

/// Path separators in a `name` would move the document into another folder.
fn file_safe_name(name: &str) -> String {
    name.trim().replace(['/', '\\'], "-")
}

/// Quote a value when YAML would otherwise misread it.
fn yaml_scalar(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value.contains(": ")
        || value.contains(" #")
        || value.ends_with(':')
        || value.starts_with(|c: char| "-?:,[]{}#&*!|>'\"%@`".contains(c) || c.is_whitespace())
        || value.ends_with(char::is_whitespace)
        || reads_as_non_string(value);
    if needs_quotes {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

/// Plain scalars YAML loads as numbers, booleans, null or timestamps.
fn reads_as_non_string(value: &str) -> bool {
    const KEYWORDS: &[&str] = &[
        "true", "false", "yes", "no", "on", "off", "y", "n", "null", "~", ".inf", "-.inf",
        "+.inf", ".nan",
    ];
    KEYWORDS.iter().any(|k| value.eq_ignore_ascii_case(k))
        || value.starts_with(|c: char| c.is_ascii_digit() || c == '+' || c == '.')
        || value.parse::<f64>().is_ok()
}

fn folder_descriptor(parts: &[String], output_parts: &[String]) -> Option<FolderDescriptor> {
    if output_parts.len() < 2 {
        return None;
    }
    let path = output_parts[..output_parts.len() - 1].join("/");
    let original = &parts[..parts.len().saturating_sub(1)];
    let title = original
        .last()
        .or_else(|| output_parts.get(output_parts.len() - 2))
        .cloned()
        .unwrap_or_default();
    Some(FolderDescriptor {
        path,
        original_path: original.join("/"),
        title,
    })
}

/// Unwrite every document whose output path is already taken.
///
/// The first document in scan order keeps the path.
fn drop_output_collisions(planned: &mut [PlannedDocument]) -> Vec<Warning> {
    let mut owners: HashMap<String, String> = HashMap::new();
    let mut warnings = Vec::new();
    for plan in planned.iter_mut().filter(|p| p.content.is_some()) {
        match owners.get(&plan.output) {
            Some(owner) => {
                warnings.push(Warning::new(
                    &plan.source,
                    format!("output \"{}\" already written from \"{owner}\"", plan.output),
                ));
                plan.content = None;
            }
            None => {
                owners.insert(plan.output.clone(), plan.source.clone());
            }
        }
    }
    warnings
}

/// One descriptor per output folder, first document wins.
fn collect_folders(written: &[&PlannedDocument]) -> Vec<FolderDescriptor> {
    let mut seen = HashSet::new();
    written
        .iter()
        .filter_map(|p| p.folder.clone())
        .filter(|f| seen.insert(f.path.clone()))
        .collect()
}

// ============================================================================
// Writing
// ============================================================================

fn reset_dir(dir: &Path) -> std::io::Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)
}

fn write_documents(
    planned: &[PlannedDocument],
    docs_dir: &Path,
    events: Option<&Sender<BuildEvent>>,
) -> std::io::Result<usize> {
    let pending: Vec<(&PlannedDocument, &String)> = planned
        .iter()
        .filter_map(|p| p.content.as_ref().map(|c| (p, c)))
        .collect();

    pending
        .par_iter()
        .try_for_each_with(events.cloned(), |tx, (plan, content)| {
            let path = docs_dir.join(&plan.output);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, content)?;
            emit(
                tx.as_ref(),
                BuildEvent::DocumentWritten {
                    source: plan.source.clone(),
                    output: plan.output.clone(),
                },
            );
            Ok::<(), std::io::Error>(())
        })?;
    Ok(pending.len())
}

fn copy_attachments(
    attachments: &[Attachment],
    dir: &Path,
    events: Option<&Sender<BuildEvent>>,
) -> std::io::Result<usize> {
    attachments
        .par_iter()
        .try_for_each_with(events.cloned(), |tx, attachment| {
            fs::write(dir.join(&attachment.public_name), &attachment.content)?;
            emit(
                tx.as_ref(),
                BuildEvent::AttachmentCopied {
                    public_name: attachment.public_name.clone(),
                },
            );
            Ok::<(), std::io::Error>(())
        })?;
    Ok(attachments.len())
}

fn write_meta(path: &Path, meta: &NavMeta) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(meta)?)?;
    Ok(())
}

// ============================================================================
// Navigation
// ============================================================================

/// Root `meta.json`: configured top-level pages in output form.
///
/// A page naming a written document resolves to that document's output path;
/// anything else (usually a folder) is remapped as a path.
pub fn root_navigation(config: &DocsConfig, written: &[&PlannedDocument]) -> NavMeta {
    let by_source: HashMap<&str, &PlannedDocument> =
        written.iter().map(|p| (p.source.as_str(), *p)).collect();

    let pages = config
        .pages
        .iter()
        .map(|entry| {
            if is_category_marker(entry) {
                return entry.clone();
            }
            let entry = nfc(entry);
            match by_source.get(entry.as_str()) {
                Some(plan) => plan.slug().to_string(),
                None => naming::strip_doc_extension(&remap_path(&entry, &config.folders)).to_string(),
            }
        })
        .collect();

    NavMeta { title: None, pages }
}

/// A folder's `meta.json` and warnings for page entries that match nothing.
pub fn folder_navigation(
    folder: &FolderDescriptor,
    config: &DocsConfig,
    written: &[&PlannedDocument],
    folders: &[FolderDescriptor],
) -> (NavMeta, Vec<Warning>) {
    let configured = config
        .folder(&folder.original_path)
        .map(|f| f.pages.as_slice())
        .unwrap_or_default();

    let mut pages = Vec::new();
    let mut warnings = Vec::new();
    for entry in configured {
        if entry == DEFAULT_ORDER_MARKER || is_category_marker(entry) {
            pages.push(entry.clone());
            continue;
        }
        match resolve_folder_entry(folder, entry, config, written, folders) {
            Some(page) => pages.push(page),
            None => warnings.push(Warning::new(
                format!("{}/{META_FILE}", folder.path),
                format!("page \"{entry}\" not found in \"{}\"", folder.original_path),
            )),
        }
    }
    if pages.is_empty() {
        pages.push(DEFAULT_ORDER_MARKER.to_string());
    }

    (
        NavMeta {
            title: Some(folder.title.clone()),
            pages,
        },
        warnings,
    )
}

/// Output name of a folder page entry: a document's basename or a
/// subfolder's last segment.
fn resolve_folder_entry(
    folder: &FolderDescriptor,
    entry: &str,
    config: &DocsConfig,
    written: &[&PlannedDocument],
    folders: &[FolderDescriptor],
) -> Option<String> {
    let target = nfc(&join_relative(&folder.original_path, entry.trim_end_matches('/')));
    let with_ext = format!("{target}.md");

    if let Some(plan) = written
        .iter()
        .find(|p| p.source == target || p.source == with_ext)
    {
        return Some(last_segment(plan.slug()));
    }
    if let Some(sub) = folders.iter().find(|f| f.original_path == target) {
        return Some(last_segment(&sub.path));
    }
    let nested = format!("{target}/");
    if written.iter().any(|p| p.source.starts_with(&nested)) {
        return Some(last_segment(&remap_path(&target, &config.folders)));
    }
    None
}

fn join_relative(base: &str, entry: &str) -> String {
    if base.is_empty() {
        entry.to_string()
    } else {
        format!("{base}/{entry}")
    }
}

fn last_segment(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}

// ============================================================================
// App files
// ============================================================================

/// Copy the configured favicon into the app, or remove a stale one.
///
/// Returns the source used, if any.
pub fn install_favicon(config_dir: &Path, app_dir: &Path) -> std::io::Result<Option<PathBuf>> {
    let target = app_dir.join(APP_ICON);
    let source = FAVICON_CANDIDATES
        .iter()
        .map(|name| config_dir.join(name))
        .find(|p| p.is_file());

    match source {
        Some(source) => {
            fs::create_dir_all(app_dir)?;
            fs::copy(&source, &target)?;
            Ok(Some(source))
        }
        None => {
            if target.exists() {
                fs::remove_file(&target)?;
            }
            Ok(None)
        }
    }
}

/// A one-line substitution in an app template file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEdit {
    /// File relative to the app directory.
    pub file: PathBuf,
    /// Declaration the target line contains, e.g. `const PROJECT_NAME = `.
    pub declaration: &'static str,
    /// `None` renders as `undefined`.
    pub value: Option<String>,
}

impl TemplateEdit {
    fn replacement(&self) -> String {
        match &self.value {
            Some(value) => format!("{}{}", self.declaration, js_string(value)),
            None => format!("{}undefined", self.declaration),
        }
    }
}

/// Single-quoted JavaScript string literal.
fn js_string(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

pub fn template_edits(config: &DocsConfig) -> Vec<TemplateEdit> {
    let layout = PathBuf::from("layout.config.jsx");
    let home = Path::new("(home)").join("[[...slug]]").join("page.tsx");
    let link = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

    vec![
        TemplateEdit {
            file: layout.clone(),
            declaration: "const PROJECT_NAME = ",
            value: Some(config.sidebar_display_name().to_string()),
        },
        TemplateEdit {
            file: layout.clone(),
            declaration: "const GITHUB_LINK = ",
            value: link(&config.github_link),
        },
        TemplateEdit {
            file: layout.clone(),
            declaration: "const TWITTER_LINK = ",
            value: link(&config.twitter_link),
        },
        TemplateEdit {
            file: layout,
            declaration: "const CONTACT_LINK = ",
            value: link(&config.contact_link),
        },
        TemplateEdit {
            file: home,
            declaration: "const PROJECT_NAME = ",
            value: Some(config.display_name().to_string()),
        },
    ]
}

/// Replace the first line containing the edit's declaration.
///
/// Returns the warning text when the file or line is missing.
pub fn apply_template_edit(app_dir: &Path, edit: &TemplateEdit) -> Result<(), String> {
    let path = app_dir.join(&edit.file);
    let content = fs::read_to_string(&path)
        .map_err(|e| format!("unable to read template, rebuild the app from scratch: {e}"))?;

    let replacement = edit.replacement();
    let mut lines: Vec<&str> = content.split('\n').collect();
    let index = lines
        .iter()
        .position(|line| line.contains(edit.declaration))
        .ok_or_else(|| {
            format!(
                "no line containing \"{}\", rebuild the app from scratch",
                edit.declaration.trim_end()
            )
        })?;
    lines[index] = &replacement;

    fs::write(&path, lines.join("\n"))
        .map_err(|e| format!("unable to write template: {e}"))
}
