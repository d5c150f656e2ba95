//! Attachment references inside a document.
//!
//! Two syntaxes point at attached files:
//!
//! - inline `![alt](src)`, any number per line, any file type
//! - Obsidian embeds `![[file.png]]`, one per line, images only
//!
//! Both resolve `src` under the attachments directory and read the file. An
//! inline reference that cannot be read keeps its original markup; an embed
//! that cannot be read (or is not an image) is dropped from the body. The
//! converter decides what to do with the line; this module only resolves
//! files and renders replacement markup.

use super::ConvertOptions;
use crate::naming::{self, AttachmentKind};
use crate::types::Attachment;
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::OnceLock;

static INLINE_IMAGE_REGEX: OnceLock<Regex> = OnceLock::new();

fn inline_image_regex() -> &'static Regex {
    INLINE_IMAGE_REGEX.get_or_init(|| {
        Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("inline image regex should compile")
    })
}

/// Read an attachment and build its record.
///
/// Returns the warning text on failure.
pub(crate) fn load(src: &str, alt: &str, options: &ConvertOptions) -> Result<Attachment, String> {
    let relative = src.trim_start_matches('/');
    let path = options.attachments_dir.join(relative);
    let content = std::fs::read(&path).map_err(|_| {
        format!(
            "Attached file - unable to read the file at \"{}\"",
            path.display()
        )
    })?;

    Ok(Attachment {
        public_name: naming::public_name(relative, options.rename_attachments),
        kind: AttachmentKind::classify(relative),
        alt: alt.to_string(),
        source_path: path,
        content,
    })
}

/// Markup pointing at a published attachment.
///
/// Videos become a self-closing `<video>` element; everything else stays
/// Markdown image syntax.
pub(crate) fn render(attachment: &Attachment, public_prefix: &str) -> String {
    let url = format!("{public_prefix}{}", attachment.public_name);
    match attachment.kind {
        AttachmentKind::Video => format!(
            "<video controls src=\"{}\" aria-label=\"{}\" />",
            escape_attribute(&url),
            escape_attribute(&attachment.alt)
        ),
        AttachmentKind::Image | AttachmentKind::Other => {
            format!("![{}]({url})", attachment.alt)
        }
    }
}

/// Escape a value for a double-quoted JSX attribute.
pub(crate) fn escape_attribute(value: &str) -> String {
    value.replace('"', "&quot;")
}

fn is_remote(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://") || src.starts_with("//")
}

/// Rewrite every inline `![alt](src)` on a line.
///
/// Successfully read files are appended to `images` and their markup is
/// rewritten; unreadable ones add a warning and keep the original text.
/// Remote URLs are left alone.
pub(crate) fn rewrite_inline(
    line: &str,
    options: &ConvertOptions,
    images: &mut Vec<Attachment>,
    warnings: &mut Vec<String>,
) -> String {
    if !line.contains("![") {
        return line.to_string();
    }

    inline_image_regex()
        .replace_all(line, |caps: &Captures| {
            let original = caps[0].to_string();
            let alt = &caps[1];
            let src = caps[2].trim();
            if src.is_empty() || is_remote(src) {
                return original;
            }
            match load(src, alt, options) {
                Ok(attachment) => {
                    let markup = render(&attachment, &options.public_prefix);
                    images.push(attachment);
                    markup
                }
                Err(warning) => {
                    warnings.push(warning);
                    original
                }
            }
        })
        .into_owned()
}

/// Target of an Obsidian embed line `![[target]]`, without any `|alias` suffix.
pub(crate) fn embed_target(line: &str) -> Option<&str> {
    let inner = line.strip_prefix("![[")?.strip_suffix("]]")?;
    let target = inner.split('|').next().unwrap_or(inner).trim();
    Some(target)
}

/// Resolve an embed target. Only [`naming::EMBED_IMAGE_EXTENSIONS`] are accepted.
pub(crate) fn load_embed(target: &str, options: &ConvertOptions) -> Result<Attachment, String> {
    if !AttachmentKind::is_embeddable(target) {
        return Err(format!(
            "Attached file - \"{}\" does not have a supported image extension",
            Path::new(target).display()
        ));
    }
    load(target, "", options)
}
