//! End-to-end builds over small docs trees.

use markdocs::naming;
use markdocs::pipeline::{self, BuildOptions, BuildReport};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const LAYOUT_TEMPLATE: &str = "\
const PROJECT_NAME = 'x'
const GITHUB_LINK = 'x'
const TWITTER_LINK = 'x'
const CONTACT_LINK = 'x'
export const baseOptions = {};
";

const HOME_TEMPLATE: &str = "\
const PROJECT_NAME = 'x'
export default function Page() {}
";

/// Create a docs tree from `(relative path, content)` pairs.
fn docs_tree(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (path, content) in files {
        let full = tmp.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }
    tmp
}

fn site_with_templates() -> TempDir {
    let site = TempDir::new().unwrap();
    let app = site.path().join("app");
    fs::create_dir_all(app.join("(home)/[[...slug]]")).unwrap();
    fs::write(app.join("layout.config.jsx"), LAYOUT_TEMPLATE).unwrap();
    fs::write(app.join("(home)/[[...slug]]/page.tsx"), HOME_TEMPLATE).unwrap();
    site
}

fn build(source: &Path, site: &Path) -> BuildReport {
    pipeline::run(
        &BuildOptions {
            source: source.to_path_buf(),
            output: site.to_path_buf(),
        },
        None,
    )
    .unwrap()
}

fn read(site: &Path, relative: &str) -> String {
    fs::read_to_string(site.join(relative))
        .unwrap_or_else(|e| panic!("cannot read {relative}: {e}"))
}

fn read_json(site: &Path, relative: &str) -> serde_json::Value {
    serde_json::from_str(&read(site, relative)).unwrap()
}

#[test]
fn front_matter_name_sets_file_name() {
    let source = docs_tree(&[
        ("_markdocs/config.toml", ""),
        ("Page.md", "---\nname: foo\n---\ncontent"),
    ]);
    let site = site_with_templates();

    let report = build(source.path(), site.path());

    assert_eq!(report.stats.documents, 1);
    assert_eq!(report.stats.warnings, 0);
    let written = read(site.path(), "content/docs/foo.mdx");
    assert_eq!(written, "---\ntitle: Page\n---\n\ncontent");
}

#[test]
fn embedded_image_published_and_other_files_dropped() {
    let source = docs_tree(&[
        ("_markdocs/config.toml", "attachmentsDir = \"files\""),
        ("files/photo.png", "png"),
        ("files/notes.pdf", "pdf"),
        ("Gallery.md", "---\nname: gallery\n---\n![[photo.png]]\n![[notes.pdf]]"),
    ]);
    let site = site_with_templates();

    let report = build(source.path(), site.path());

    let public = naming::public_name("photo.png", true);
    let written = read(site.path(), "content/docs/gallery.mdx");
    assert!(written.contains(&format!("![](/attached-files/{public})")));
    assert!(!written.contains("notes.pdf"));
    assert_eq!(
        fs::read(site.path().join("public/attached-files").join(&public)).unwrap(),
        b"png"
    );
    assert_eq!(report.stats.attachments, 1);
    assert_eq!(report.stats.warnings, 1);
}

#[test]
fn folders_remapped_and_navigation_written() {
    let source = docs_tree(&[
        (
            "_markdocs/config.toml",
            r#"
pages = ["Start.md", "---Guides---", "Guides"]

[folders."Guides"]
slug = "guides"
pages = ["Second.md", "First.md"]
"#,
        ),
        ("Start.md", "---\nname: start\n---\nhi"),
        ("Guides/First.md", "---\nname: first\n---\none"),
        ("Guides/Second.md", "---\nname: second\n---\ntwo"),
    ]);
    let site = site_with_templates();

    build(source.path(), site.path());

    assert!(site.path().join("content/docs/guides/first.mdx").is_file());
    assert_eq!(
        read_json(site.path(), "content/docs/meta.json"),
        serde_json::json!({ "pages": ["start", "---Guides---", "guides"] })
    );
    assert_eq!(
        read_json(site.path(), "content/docs/guides/meta.json"),
        serde_json::json!({ "title": "Guides", "pages": ["second", "first"] })
    );
}

#[test]
fn unconfigured_folder_uses_default_order() {
    let source = docs_tree(&[
        ("_markdocs/config.toml", ""),
        ("Notes/Idea.md", "---\nname: idea\n---\nx"),
    ]);
    let site = site_with_templates();

    build(source.path(), site.path());

    assert_eq!(
        read_json(site.path(), "content/docs/Notes/meta.json"),
        serde_json::json!({ "title": "Notes", "pages": ["..."] })
    );
}

#[test]
fn empty_document_skipped_with_warning() {
    let source = docs_tree(&[
        ("_markdocs/config.toml", ""),
        ("Empty.md", "---\nname: empty\n---\n"),
    ]);
    let site = site_with_templates();

    let report = build(source.path(), site.path());

    assert_eq!(report.stats.documents, 0);
    assert_eq!(report.stats.warnings, 1);
    assert!(!site.path().join("content/docs/empty.mdx").exists());
}

#[test]
fn templates_and_favicon_updated() {
    let source = docs_tree(&[
        (
            "_markdocs/config.toml",
            "name = \"Acme\"\nsidebarName = \"Acme's Docs\"\ngithubLink = \"https://github.com/acme\"",
        ),
        ("_markdocs/icon.png", "icon"),
        ("A.md", "---\nname: a\n---\nx"),
    ]);
    let site = site_with_templates();

    let report = build(source.path(), site.path());

    assert_eq!(report.stats.warnings, 0);
    let layout = read(site.path(), "app/layout.config.jsx");
    assert!(layout.contains("const PROJECT_NAME = 'Acme\\'s Docs'\n"));
    assert!(layout.contains("const GITHUB_LINK = 'https://github.com/acme'\n"));
    assert!(layout.contains("const TWITTER_LINK = undefined\n"));
    let home = read(site.path(), "app/(home)/[[...slug]]/page.tsx");
    assert!(home.starts_with("const PROJECT_NAME = 'Acme'\n"));
    assert_eq!(fs::read(site.path().join("app/icon.png")).unwrap(), b"icon");
}

#[test]
fn missing_templates_are_warnings() {
    let source = docs_tree(&[("_markdocs/config.toml", ""), ("A.md", "---\nname: a\n---\nx")]);
    let site = TempDir::new().unwrap();

    let report = build(source.path(), site.path());

    assert_eq!(report.stats.documents, 1);
    assert_eq!(report.stats.warnings, 5);
}

#[test]
fn rebuild_replaces_previous_output() {
    let source = docs_tree(&[
        ("_markdocs/config.toml", ""),
        ("Old.md", "---\nname: old\n---\nx"),
    ]);
    let site = site_with_templates();
    build(source.path(), site.path());
    assert!(site.path().join("content/docs/old.mdx").is_file());

    fs::remove_file(source.path().join("Old.md")).unwrap();
    fs::write(source.path().join("New.md"), "---\nname: new\n---\ny").unwrap();
    build(source.path(), site.path());

    assert!(!site.path().join("content/docs/old.mdx").exists());
    assert!(site.path().join("content/docs/new.mdx").is_file());
}

#[test]
fn hidden_and_config_directories_not_published() {
    let source = docs_tree(&[
        ("_markdocs/config.toml", ""),
        ("_markdocs/notes.md", "internal"),
        (".trash/Deleted.md", "---\nname: deleted\n---\nx"),
        ("Kept.md", "---\nname: kept\n---\nx"),
    ]);
    let site = site_with_templates();

    let report = build(source.path(), site.path());

    assert_eq!(report.stats.documents, 1);
    assert!(site.path().join("content/docs/kept.mdx").is_file());
}

#[test]
fn missing_config_fails_build() {
    let source = docs_tree(&[("A.md", "x")]);
    let site = TempDir::new().unwrap();
    let result = pipeline::run(
        &BuildOptions {
            source: source.path().to_path_buf(),
            output: site.path().to_path_buf(),
        },
        None,
    );
    assert!(result.is_err());
}

#[test]
fn uppercase_extension_written_as_mdx() {
    let source = docs_tree(&[("_markdocs/config.toml", ""), ("Guides/README.MD", "x")]);
    let site = site_with_templates();

    let report = build(source.path(), site.path());

    assert_eq!(report.stats.documents, 1);
    assert!(site.path().join("content/docs/Guides/README.mdx").is_file());
    assert!(!site.path().join("content/docs/Guides/README.MD.mdx").exists());
}
