//! Document conversion.
//!
//! Stage 2 of the build pipeline. Converts every scanned document in
//! parallel, then gathers the attachments they reference into one list with
//! a single entry per public name.
//!
//! Conversion is pure apart from reading attachments, so documents are
//! handed to rayon as-is. Results come back in scan order, which makes the
//! "first reference wins" rule for attachments deterministic.

use crate::convert::{self, Conversion, ConvertOptions};
use crate::pipeline::{BuildEvent, emit};
use crate::scan::{SourceDocument, SourceTree};
use crate::types::{Attachment, Document, Warning};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

#[derive(Debug, Default)]
pub struct ProcessResult {
    /// Converted documents, in scan order.
    pub documents: Vec<Document>,
    /// One entry per public name, owned by its first referencing document.
    pub attachments: Vec<Attachment>,
    /// Conversion warnings plus attachment name collisions.
    pub warnings: Vec<Warning>,
}

pub fn process(
    tree: &SourceTree,
    options: &ConvertOptions,
    events: Option<&Sender<BuildEvent>>,
) -> ProcessResult {
    let converted: Vec<(Document, Vec<Attachment>)> = tree
        .documents
        .par_iter()
        .map_with(events.cloned(), |tx, source| {
            let conversion = convert::convert_markdown(&source.content, options);
            emit(
                tx.as_ref(),
                BuildEvent::DocumentConverted {
                    source: source.relative_path(),
                    warnings: conversion.warnings.clone(),
                },
            );
            into_document(source, conversion)
        })
        .collect();

    let mut warnings = Vec::new();
    let mut documents = Vec::with_capacity(converted.len());
    let mut references = Vec::new();
    for (document, images) in converted {
        let context = document.relative_path();
        warnings.extend(
            document
                .warnings
                .iter()
                .map(|w| Warning::new(context.clone(), w.clone())),
        );
        references.push((context, images));
        documents.push(document);
    }

    let (attachments, conflicts) = dedupe_attachments(references);
    for conflict in &conflicts {
        emit(events, BuildEvent::Warning(conflict.clone()));
    }
    warnings.extend(conflicts);

    ProcessResult {
        documents,
        attachments,
        warnings,
    }
}

fn into_document(source: &SourceDocument, conversion: Conversion) -> (Document, Vec<Attachment>) {
    let Conversion {
        warnings,
        images,
        imports,
        metadata,
        body,
    } = conversion;
    let document = Document {
        source_path: source.path.clone(),
        parts: source.parts.clone(),
        title: source.title.clone(),
        metadata,
        body,
        imports,
        warnings,
    };
    (document, images)
}

/// Keep the first attachment seen for each public name.
///
/// A later reference to the same name from a different file is a collision:
/// it is reported against the referencing document and not copied.
fn dedupe_attachments(
    references: Vec<(String, Vec<Attachment>)>,
) -> (Vec<Attachment>, Vec<Warning>) {
    let mut owners: HashMap<String, PathBuf> = HashMap::new();
    let mut unique = Vec::new();
    let mut conflicts = Vec::new();

    for (context, images) in references {
        for image in images {
            match owners.get(&image.public_name) {
                None => {
                    owners.insert(image.public_name.clone(), image.source_path.clone());
                    unique.push(image);
                }
                Some(owner) if *owner != image.source_path => {
                    conflicts.push(Warning::new(
                        context.clone(),
                        format!(
                            "attachment \"{}\" is published as \"{}\", already taken by \"{}\"; not copied",
                            image.source_path.display(),
                            image.public_name,
                            owner.display()
                        ),
                    ));
                }
                Some(_) => {}
            }
        }
    }
    (unique, conflicts)
}
