//! Internal link checker for the static site.
//!
//! Walks a site root for HTML files, extracts href/src values, and reports
//! any internal link that does not resolve to an existing file. External
//! http(s), mailto, tel, javascript, data and pure-anchor links are skipped.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)(?:href|src)=["']([^"']+)["']"#).unwrap());

const SKIP_DIRS: [&str; 5] = [".git", "node_modules", "target", "_audit", ".do"];

struct BrokenLink {
    source: PathBuf,
    link: String,
    resolved: PathBuf,
}

fn main() -> ExitCode {
    let root = std::env::args().nth(1).unwrap_or_else(|| ".".to_string());
    let root = match std::fs::canonicalize(&root) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Cannot open root directory {root}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let files = html_files(&root);

    println!("Internal Link Check Report");
    println!("==========================");
    println!("Root: {}", root.display());
    println!("HTML files found: {}", files.len());
    println!();

    let mut total_links = 0usize;
    let mut valid_links = 0usize;
    let mut broken = Vec::new();

    for file in &files {
        let content = match std::fs::read_to_string(file) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Cannot read {}: {e}", file.display());
                continue;
            }
        };

        for link in extract_links(&content) {
            if !is_internal_link(&link) {
                continue;
            }

            total_links += 1;
            let resolved = resolve_link(&link, &root, file);

            if resolved.exists() {
                valid_links += 1;
            } else {
                broken.push(BrokenLink {
                    source: file.strip_prefix(&root).unwrap_or(file).to_path_buf(),
                    link,
                    resolved,
                });
            }
        }
    }

    println!("RESULTS");
    println!("-------");
    println!("Total internal links checked: {total_links}");
    println!("Valid links: {valid_links}");
    println!("Broken links: {}", broken.len());
    println!();

    if broken.is_empty() {
        println!("No broken internal links found.");
        return ExitCode::SUCCESS;
    }

    println!("BROKEN LINKS:");
    println!();
    for item in &broken {
        let resolved = item.resolved.strip_prefix(&root).unwrap_or(&item.resolved);
        println!("  Source: {}", item.source.display());
        println!("  Link: {}", item.link);
        println!("  Resolved to: {}", resolved.display());
        println!();
    }

    ExitCode::FAILURE
}

/// All .html files under `root`, skipping VCS, dependency and build
/// directories.
fn html_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| {
            !(e.file_type().is_dir()
                && e.file_name()
                    .to_str()
                    .is_some_and(|name| SKIP_DIRS.contains(&name)))
        })
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
        })
        .map(|e| e.into_path())
        .collect()
}

fn extract_links(content: &str) -> Vec<String> {
    LINK_RE
        .captures_iter(content)
        .map(|c| c[1].to_string())
        .collect()
}

/// Anything that is not a full URL, a mail/phone/script URI, a data URI or
/// a pure in-page anchor is an internal link worth checking.
fn is_internal_link(link: &str) -> bool {
    const EXTERNAL_PREFIXES: [&str; 6] =
        ["http://", "https://", "mailto:", "tel:", "javascript:", "data:"];

    !link.starts_with('#') && !EXTERNAL_PREFIXES.iter().any(|p| link.starts_with(p))
}

/// Resolve a link to the file it should point at. Query strings and
/// fragments are stripped first; root-relative paths resolve against the
/// scan root, everything else against the referencing file's directory.
fn resolve_link(link: &str, root: &Path, source: &Path) -> PathBuf {
    let clean = link
        .split(['?', '#'])
        .next()
        .unwrap_or(link);

    if let Some(rel) = clean.strip_prefix('/') {
        root.join(rel)
    } else {
        source.parent().unwrap_or(root).join(clean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn classifies_external_links() {
        assert!(!is_internal_link("https://example.com"));
        assert!(!is_internal_link("http://example.com/x.html"));
        assert!(!is_internal_link("mailto:info@example.com"));
        assert!(!is_internal_link("tel:+442079460000"));
        assert!(!is_internal_link("javascript:void(0)"));
        assert!(!is_internal_link("data:image/png;base64,xyz"));
        assert!(!is_internal_link("#pricing"));

        assert!(is_internal_link("/services.html"));
        assert!(is_internal_link("../index.html"));
        assert!(is_internal_link("css/site.css"));
    }

    #[test]
    fn extracts_href_and_src_values() {
        let html = r#"<a href="/a.html">x</a><img src='img/logo.png'><a HREF="/b.html">y</a>"#;
        let links = extract_links(html);
        assert_eq!(links, vec!["/a.html", "img/logo.png", "/b.html"]);
    }

    #[test]
    fn resolves_root_relative_and_file_relative() {
        let root = Path::new("/site");
        let source = Path::new("/site/pages/about.html");

        assert_eq!(
            resolve_link("/css/site.css", root, source),
            PathBuf::from("/site/css/site.css")
        );
        assert_eq!(
            resolve_link("team.html", root, source),
            PathBuf::from("/site/pages/team.html")
        );
    }

    #[test]
    fn strips_query_and_fragment_before_resolving() {
        let root = Path::new("/site");
        let source = Path::new("/site/index.html");
        assert_eq!(
            resolve_link("/services.html?ref=nav#top", root, source),
            PathBuf::from("/site/services.html")
        );
    }

    #[test]
    fn finds_broken_links_and_skips_excluded_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        fs::write(
            root.join("a.html"),
            r#"<a href="/missing.html">gone</a><a href="https://example.com">out</a><a href="b.html">ok</a>"#,
        )
        .unwrap();
        fs::write(root.join("b.html"), "<p>fine</p>").unwrap();
        fs::create_dir(root.join("node_modules")).unwrap();
        fs::write(root.join("node_modules/ignored.html"), "<p>skip</p>").unwrap();

        let files = html_files(root);
        assert_eq!(files.len(), 2);

        let content = fs::read_to_string(root.join("a.html")).unwrap();
        let internal: Vec<String> = extract_links(&content)
            .into_iter()
            .filter(|l| is_internal_link(l))
            .collect();
        assert_eq!(internal, vec!["/missing.html", "b.html"]);

        let broken: Vec<PathBuf> = internal
            .iter()
            .map(|l| resolve_link(l, root, &root.join("a.html")))
            .filter(|p| !p.exists())
            .collect();
        assert_eq!(broken, vec![root.join("missing.html")]);
    }
}
