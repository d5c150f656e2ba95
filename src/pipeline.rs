//! Full build: scan → process → generate.
//!
//! [`run`] ties the three stages together and totals their results. Each
//! stage reports progress through an optional [`BuildEvent`] channel; the
//! library itself never prints.

use crate::convert::{ConvertOptions, Origin};
use crate::generate::{self, GenerateError, OutputLayout, PUBLIC_ATTACHMENTS_PREFIX};
use crate::process::{self, ProcessResult};
use crate::scan::{self, ScanError, SourceTree};
use crate::types::Warning;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error("Generate failed: {0}")]
    Generate(#[from] GenerateError),
}

/// Progress reported while a build runs.
#[derive(Debug, Clone)]
pub enum BuildEvent {
    ScanCompleted {
        documents: usize,
    },
    DocumentConverted {
        source: String,
        warnings: Vec<String>,
    },
    DocumentWritten {
        source: String,
        output: String,
    },
    DocumentSkipped {
        source: String,
        reason: String,
    },
    AttachmentCopied {
        public_name: String,
    },
    Warning(Warning),
    MetadataWritten {
        path: String,
    },
    Finalized,
}

/// Send an event if anyone is listening. A closed channel is ignored.
pub(crate) fn emit(events: Option<&Sender<BuildEvent>>, event: BuildEvent) {
    if let Some(tx) = events {
        tx.send(event).ok();
    }
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Docs root holding the Markdown tree and `_markdocs/`.
    pub source: PathBuf,
    /// Site root receiving `content/docs`, `public/attached-files` and `app`.
    pub output: PathBuf,
}

/// Counters reported at the end of a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    #[serde(rename = "warn")]
    pub warnings: usize,
    #[serde(rename = "files")]
    pub documents: usize,
    pub attachments: usize,
}

#[derive(Debug)]
pub struct BuildReport {
    pub stats: BuildStats,
    pub warnings: Vec<Warning>,
}

/// Result of a dry run: everything converted, nothing written.
#[derive(Debug)]
pub struct CheckReport {
    pub tree: SourceTree,
    pub processed: ProcessResult,
}

impl CheckReport {
    pub fn warnings(&self) -> Vec<&Warning> {
        self.tree
            .warnings
            .iter()
            .chain(&self.processed.warnings)
            .collect()
    }
}

/// Options every document in a build is converted with.
pub fn build_convert_options(tree: &SourceTree) -> ConvertOptions {
    ConvertOptions {
        origin: Origin::Obsidian,
        attachments_dir: tree.attachments_dir.clone(),
        rename_attachments: true,
        public_prefix: PUBLIC_ATTACHMENTS_PREFIX.to_string(),
    }
}

/// Run the whole build.
///
/// Fails only when the source tree or config is unusable, or when writing
/// output fails. Everything else is counted as a warning.
pub fn run(
    options: &BuildOptions,
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildReport, PipelineError> {
    let events = events.as_ref();

    let tree = scan::scan(&options.source)?;
    for warning in &tree.warnings {
        emit(events, BuildEvent::Warning(warning.clone()));
    }
    emit(
        events,
        BuildEvent::ScanCompleted {
            documents: tree.documents.len(),
        },
    );

    let processed = process::process(&tree, &build_convert_options(&tree), events);

    let layout = OutputLayout::new(&options.output);
    let generated = generate::generate(
        &processed,
        &tree.config,
        &tree.config_dir(),
        &layout,
        events,
    )?;
    emit(events, BuildEvent::Finalized);

    let warnings: Vec<Warning> = tree
        .warnings
        .into_iter()
        .chain(processed.warnings)
        .chain(generated.warnings)
        .collect();

    Ok(BuildReport {
        stats: BuildStats {
            warnings: warnings.len(),
            documents: generated.documents_written,
            attachments: generated.attachments_copied,
        },
        warnings,
    })
}

/// Scan and convert without writing anything.
pub fn check(
    source: &std::path::Path,
    events: Option<Sender<BuildEvent>>,
) -> Result<CheckReport, PipelineError> {
    let events = events.as_ref();
    let tree = scan::scan(source)?;
    emit(
        events,
        BuildEvent::ScanCompleted {
            documents: tree.documents.len(),
        },
    );
    let processed = process::process(&tree, &build_convert_options(&tree), events);
    Ok(CheckReport { tree, processed })
}
