//! Markdown dialect conversion.
//!
//! Turns one document's raw text into a [`Conversion`]: the rewritten body,
//! the front-matter metadata, the attachments it references, the component
//! imports it needs, and any warnings. Conversion is a single forward pass
//! over lines with a small mode stack; every call owns its own stack, so
//! documents can be converted concurrently.
//!
//! ## Modes
//!
//! | Mode | Opened by | Closed by | Lines inside |
//! |------|-----------|-----------|--------------|
//! | `Codeblock` | a line starting with ```` ``` ```` | the next ```` ``` ```` line | copied verbatim, fences included |
//! | `CustomComponent` | ```` ```component ```` | the next ```` ``` ```` line | dropped |
//! | `Metadata` | `---` before any metadata | `---` | parsed as `key: value` |
//! | `Callout` | `> [!type] title` (Obsidian) | a blank line | folded into the callout body |
//!
//! Entering a mode pushes it, leaving pops back to the previous one. A line of
//! exactly four hyphens is a horizontal rule and never opens or closes a mode.
//!
//! ## Line Rewrites (outside code blocks)
//!
//! - `![alt](src)` → published attachment reference ([`attachments`])
//! - table rows: `<br>` → `<br/>`
//! - `![[image.png]]` → published image (Obsidian), non-images dropped
//! - `<!-- comment -->` lines removed, with the blank line after them
//! - `%% comment %%` lines removed and reported (Obsidian)
//! - `## Heading ^anchor` → `## Heading [#anchor]` (Obsidian)
//!
//! Leading and trailing blank lines of the result are trimmed; blank lines
//! inside the body are kept.

mod attachments;
pub mod imports;

use crate::types::Attachment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Editor the document was written with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Plain Markdown: no callouts, embeds, comments or block anchors.
    #[default]
    Default,
    /// Obsidian-flavoured Markdown.
    Obsidian,
}

/// Inputs for a single conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub origin: Origin,
    /// Directory attachment references resolve against.
    pub attachments_dir: PathBuf,
    /// Publish attachments under hashed names instead of their file names.
    pub rename_attachments: bool,
    /// URL prefix for published attachments, e.g. `/attached-files/`.
    pub public_prefix: String,
}

/// Result of converting one document.
#[derive(Debug, Default, Serialize)]
pub struct Conversion {
    pub warnings: Vec<String>,
    pub images: Vec<Attachment>,
    pub imports: Vec<String>,
    pub metadata: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Codeblock,
    CustomComponent,
    Metadata,
    Callout,
}

/// Mode history. The last entry is the active mode.
#[derive(Debug, Default)]
struct ModeStack {
    history: Vec<Mode>,
}

impl ModeStack {
    fn current(&self) -> Option<Mode> {
        self.history.last().copied()
    }

    fn is(&self, mode: Mode) -> bool {
        self.current() == Some(mode)
    }

    /// Push `mode` unless it is already active.
    fn enter(&mut self, mode: Mode) -> bool {
        if self.is(mode) {
            return false;
        }
        self.history.push(mode);
        true
    }

    fn leave(&mut self) {
        self.history.pop();
    }
}

const HORIZONTAL_RULE: &str = "----";
const METADATA_FENCE: &str = "---";
const CODE_FENCE: &str = "```";
const COMPONENT_FENCE: &str = "```component";
const CALLOUT_CLOSE: &str = "</Callout>";

/// Convert one document.
///
/// Never fails: unreadable attachments and unsupported embeds become
/// warnings, and malformed metadata lines are read best-effort.
pub fn convert_markdown(content: &str, options: &ConvertOptions) -> Conversion {
    let obsidian = options.origin == Origin::Obsidian;
    let lines: Vec<&str> = content
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();

    let mut result = Conversion::default();
    let mut modes = ModeStack::default();
    let mut body = String::with_capacity(content.len());
    let mut i = 0;

    while i < lines.len() {
        let raw = lines[i];
        i += 1;
        let trimmed = raw.trim();

        if raw == HORIZONTAL_RULE {
            body.push_str(HORIZONTAL_RULE);
            body.push('\n');
            continue;
        }

        // Code blocks
        if modes.is(Mode::Codeblock) {
            if trimmed.starts_with(CODE_FENCE) {
                modes.leave();
            }
            push_line(&mut body, raw);
            continue;
        }
        if !modes.is(Mode::CustomComponent)
            && trimmed.starts_with(CODE_FENCE)
            && !trimmed.starts_with(COMPONENT_FENCE)
        {
            modes.enter(Mode::Codeblock);
            push_line(&mut body, raw);
            continue;
        }

        // Raw component markup is not documentation prose
        if modes.is(Mode::CustomComponent) {
            if trimmed.starts_with(CODE_FENCE) {
                modes.leave();
            }
            continue;
        }
        if trimmed.starts_with(COMPONENT_FENCE) {
            modes.enter(Mode::CustomComponent);
            continue;
        }

        // Front matter
        if modes.is(Mode::Metadata) {
            if trimmed == METADATA_FENCE {
                modes.leave();
            } else if !trimmed.is_empty() {
                let (key, value) = split_metadata_line(raw);
                result.metadata.insert(key, value);
            }
            continue;
        }
        if trimmed == METADATA_FENCE && result.metadata.is_empty() {
            modes.enter(Mode::Metadata);
            continue;
        }

        let mut line =
            attachments::rewrite_inline(raw, options, &mut result.images, &mut result.warnings);

        if line.starts_with('|') && line.ends_with('|') {
            line = line.replace("<br>", "<br/>");
        }

        if obsidian && let Some((kind, title)) = parse_callout_header(&line) {
            if !modes.enter(Mode::Callout) {
                // A new callout right after another one closes the first
                body.push('\n');
                body.push_str(CALLOUT_CLOSE);
                body.push_str("\n\n");
            }
            body.push_str(&callout_open_tag(&kind, &title));
            body.push('\n');
            continue;
        }

        if obsidian && modes.is(Mode::Callout) {
            if line.is_empty() {
                modes.leave();
                body.push('\n');
                body.push_str(CALLOUT_CLOSE);
                body.push_str("\n\n");
            } else {
                let inner = match line.strip_prefix('>') {
                    Some(rest) => rest.trim(),
                    None => line.trim(),
                };
                body.push_str(inner);
                body.push_str("<br/>\n");
            }
            continue;
        }

        if obsidian && let Some(target) = attachments::embed_target(&line) {
            match attachments::load_embed(target, options) {
                Ok(attachment) => {
                    push_line(
                        &mut body,
                        &attachments::render(&attachment, &options.public_prefix),
                    );
                    result.images.push(attachment);
                }
                Err(warning) => result.warnings.push(warning),
            }
            continue;
        }

        if line.starts_with("<!--") && line.ends_with("-->") {
            skip_following_blank(&lines, &mut i);
            continue;
        }

        if obsidian && line.len() >= 2 && line.starts_with("%%") && line.ends_with("%%") {
            result.warnings.push(format!("Comment - {line}"));
            skip_following_blank(&lines, &mut i);
            continue;
        }

        if obsidian && line.starts_with('#') {
            push_line(&mut body, &rewrite_heading_anchor(&line));
            continue;
        }

        push_line(&mut body, &line);
    }

    // Unwind whatever is still open, innermost first
    while let Some(mode) = modes.current() {
        match mode {
            Mode::Callout => {
                body.push('\n');
                body.push_str(CALLOUT_CLOSE);
                body.push('\n');
            }
            Mode::Codeblock => result
                .warnings
                .push("Code block - the last code block is never closed".to_string()),
            Mode::Metadata => result
                .warnings
                .push("Metadata - the front matter block is never closed".to_string()),
            Mode::CustomComponent => {}
        }
        modes.leave();
    }

    result.body = trim_blank_lines(&body).to_string();
    result.imports = imports::detect_imports(&result.body);
    result
}

fn push_line(body: &mut String, line: &str) {
    body.push_str(line);
    body.push('\n');
}

/// Consume the next line if it is empty, so a removed comment leaves no gap.
fn skip_following_blank(lines: &[&str], i: &mut usize) {
    if lines.get(*i).is_some_and(|next| next.is_empty()) {
        *i += 1;
    }
}

/// Split `key: value` on the first colon. Without a colon the whole line is the key.
fn split_metadata_line(line: &str) -> (String, String) {
    match line.split_once(':') {
        Some((key, value)) => (key.trim().to_string(), value.trim().to_string()),
        None => (line.trim().to_string(), String::new()),
    }
}

/// Parse `> [!type] title` (the space after `>` is optional).
///
/// Returns the normalized callout kind and the title (possibly empty). A fold
/// marker (`-` or `+`) right after the closing bracket is ignored.
fn parse_callout_header(line: &str) -> Option<(String, String)> {
    let rest = line
        .strip_prefix("> [!")
        .or_else(|| line.strip_prefix(">[!"))?;
    let (kind, title) = rest.split_once(']')?;

    let title = title.trim();
    let title = title
        .strip_prefix(['-', '+'])
        .map(str::trim_start)
        .unwrap_or(title);

    Some((normalize_callout_kind(kind), title.to_string()))
}

/// Collapse Obsidian callout types into the site's three categories.
fn normalize_callout_kind(kind: &str) -> String {
    match kind.trim().to_lowercase().as_str() {
        "warn" | "warning" => "warn".to_string(),
        "error" => "error".to_string(),
        _ => "info".to_string(),
    }
}

fn callout_open_tag(kind: &str, title: &str) -> String {
    if title.is_empty() {
        format!("<Callout type=\"{kind}\">")
    } else {
        format!(
            "<Callout title=\"{}\" type=\"{kind}\">",
            attachments::escape_attribute(title)
        )
    }
}

/// Turn a trailing block reference `^anchor` on a heading into `[#anchor]`.
fn rewrite_heading_anchor(line: &str) -> String {
    let content = line.trim_end();
    if let Some((heading, last)) = content.rsplit_once(' ')
        && let Some(anchor) = last.strip_prefix('^')
        && !anchor.is_empty()
    {
        return format!("{heading} [#{anchor}]");
    }
    line.to_string()
}

/// Drop the leading and trailing runs of blank lines.
fn trim_blank_lines(body: &str) -> &str {
    let mut start = 0;
    for line in body.split_inclusive('\n') {
        if !line.trim().is_empty() {
            break;
        }
        start += line.len();
    }

    let rest = &body[start..];
    let mut end = rest.len();
    for line in rest.rsplit_terminator('\n') {
        if !line.trim().is_empty() {
            break;
        }
        // The separator before this blank line goes too
        end = end.saturating_sub(line.len() + 1);
    }
    rest[..end].trim_end_matches('\n')
}
