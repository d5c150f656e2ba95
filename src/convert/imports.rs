//! Import lines for site-framework components used in a document body.
//!
//! MDX needs an explicit import for every component that is not provided
//! globally. After conversion the body is scanned for opening tags, and each
//! known component found adds its import line once, in table order.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Known components and the import each one needs.
pub const COMPONENT_IMPORTS: &[(&str, &str)] = &[
    ("Accordion", "import { Accordion } from 'fumadocs-ui/components/accordion';"),
    ("Accordions", "import { Accordions } from 'fumadocs-ui/components/accordion';"),
    ("Banner", "import { Banner } from 'fumadocs-ui/components/banner';"),
    ("Files", "import { Files } from 'fumadocs-ui/components/files';"),
    ("File", "import { File } from 'fumadocs-ui/components/files';"),
    ("Folder", "import { Folder } from 'fumadocs-ui/components/files';"),
    ("MDX", "import defaultMdxComponents from 'fumadocs-ui/mdx';"),
    ("ImageZoom", "import { ImageZoom } from 'fumadocs-ui/components/image-zoom';"),
    ("InlineTOC", "import { InlineTOC } from 'fumadocs-ui/components/inline-toc';"),
    ("RootToggle", "import { RootToggle } from 'fumadocs-ui/components/layout/root-toggle';"),
    ("Step", "import { Step } from 'fumadocs-ui/components/steps';"),
    ("Steps", "import { Steps } from 'fumadocs-ui/components/steps';"),
    ("Tab", "import { Tab } from 'fumadocs-ui/components/tabs';"),
    ("Tabs", "import { Tabs } from 'fumadocs-ui/components/tabs';"),
    ("TypeTable", "import { TypeTable } from 'fumadocs-ui/components/type-table';"),
];

static TAG_REGEX: OnceLock<Regex> = OnceLock::new();

fn tag_regex() -> &'static Regex {
    TAG_REGEX.get_or_init(|| Regex::new(r"<([A-Za-z][A-Za-z0-9]*)").expect("tag regex should compile"))
}

/// Import lines for every known component opened in `body`.
///
/// Tags match by full name: `<Tabs>` imports `Tabs` but not `Tab`.
pub fn detect_imports(body: &str) -> Vec<String> {
    let used: HashSet<&str> = tag_regex()
        .captures_iter(body)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();

    let mut imports: Vec<String> = Vec::new();
    for (component, import) in COMPONENT_IMPORTS {
        if used.contains(component) && !imports.iter().any(|i| i == import) {
            imports.push(import.to_string());
        }
    }
    imports
}
