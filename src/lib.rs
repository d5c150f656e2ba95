//! # markdocs
//!
//! Turns a directory of Obsidian-flavoured Markdown into the content tree of
//! a static documentation site. Notes keep living in the editor; the build
//! converts them to MDX, renames folders to URL slugs, publishes attached
//! files, and writes the navigation files the site framework reads.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Scan      docs/          →  SourceTree      (config + Markdown files)
//! 2. Process   SourceTree     →  ProcessResult   (converted documents + attachments)
//! 3. Generate  ProcessResult  →  site/           (MDX, meta.json, attachments, app edits)
//! ```
//!
//! Stages hand plain values to each other, so each can be tested on its own:
//! conversion never touches the output tree, and generation never re-reads
//! sources. [`pipeline::run`] chains them and totals the counts.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: loads the config and collects every `.md` file under the docs root |
//! | [`process`] | Stage 2: converts documents in parallel, deduplicates attachments |
//! | [`generate`] | Stage 3: writes documents, attachments, navigation, favicon and template edits |
//! | [`pipeline`] | Runs the stages, reports [`pipeline::BuildEvent`]s, returns build stats |
//! | [`convert`] | Markdown dialect conversion: front matter, callouts, embeds, comments, anchors |
//! | [`remap`] | Rewrites relative paths through configured folder slugs |
//! | [`walk`] | Recursive file listing with hidden/dependency directory pruning |
//! | [`config`] | `_markdocs/config.toml` loading, validation and Unicode normalization |
//! | [`naming`] | Attachment kinds, published attachment names, document file names |
//! | [`types`] | Shared types passed between stages (`Document`, `Attachment`, `NavMeta`) |
//! | [`output`] | CLI output formatting of progress, summaries and check results |
//!
//! # Design Decisions
//!
//! ## Warnings Over Failures
//!
//! Only an unusable source tree (missing directory, missing or invalid
//! config) or a failed write stops a build. A broken image link, a document
//! without a `name`, or a missing template line becomes a
//! [`types::Warning`] with the document or file it concerns, and the build
//! carries on. Half-migrated vaults still produce a browsable site.
//!
//! ## Deterministic Attachment Names
//!
//! Published attachments are named by a hash of their file name, not a random
//! token. Two documents embedding the same picture share one copy, and two
//! different pictures with the same file name collide visibly (a warning)
//! instead of silently overwriting each other. See [`naming::public_name`].
//!
//! ## Unicode Normalization
//!
//! macOS stores file names decomposed while config files are usually typed
//! composed. Every path and config key is compared in NFC, so `Général/` in
//! the config finds `Général/` on disk whatever form either uses.
//!
//! ## Whole-Segment Folder Remapping
//!
//! A folder slug replaces a path prefix only at a `/` boundary: configuring
//! `Guide` never renames `Guides/`. Deeper folders are rewritten first, so a
//! nested folder can be moved independently of its parent.

pub mod config;
pub mod convert;
pub mod generate;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod remap;
pub mod scan;
pub mod types;
pub mod walk;

#[cfg(test)]
pub(crate) mod test_helpers;
