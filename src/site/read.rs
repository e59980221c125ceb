// src/site/read.rs
// =============================================================================
// Loading site data files and generated pages.
//
// - JSON data files are parsed into serde_json::Value; a broken file is
//   reported by path
// - HTML pages are read into an HtmlPage with their links already extracted
// =============================================================================

use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::error::SiteError;
use crate::checker::{extract_page_links, PageLinks};

/// One generated page plus whatever the checks found on it.
#[derive(Debug, Clone, Serialize)]
pub struct HtmlPage {
    pub path: PathBuf,
    #[serde(skip_serializing)]
    pub content: String,
    #[serde(flatten)]
    pub links: PageLinks,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Parses every file as JSON, in order.
pub fn read_json(files: &[PathBuf]) -> Result<Vec<Value>, SiteError> {
    files
        .iter()
        .map(|file| {
            let content = fs::read_to_string(file).map_err(|e| SiteError::Io(file.clone(), e))?;
            serde_json::from_str(&content).map_err(|e| SiteError::Json(file.clone(), e))
        })
        .collect()
}

pub fn read_html_file(path: &Path) -> Result<HtmlPage, SiteError> {
    let content = fs::read_to_string(path).map_err(|e| SiteError::Io(path.to_path_buf(), e))?;
    let links = extract_page_links(&content);

    Ok(HtmlPage {
        path: path.to_path_buf(),
        content,
        links,
        errors: Vec::new(),
        warnings: Vec::new(),
    })
}

/// Reads each file and hands its content to `on_file`.
///
/// An unreadable file is logged and skipped. Returns how many files were
/// handed over.
pub fn read_source_files<F>(files: &[PathBuf], mut on_file: F) -> usize
where
    F: FnMut(&Path, String),
{
    let mut read = 0;
    for file in files {
        match fs::read_to_string(file) {
            Ok(content) => {
                on_file(file.as_path(), content);
                read += 1;
            }
            Err(e) => warn!(path = %file.display(), error = %e, "skipping unreadable source file"),
        }
    }
    read
}

/// Reads all pages; the first unreadable one aborts.
pub fn read_html_files(paths: &[PathBuf]) -> Result<Vec<HtmlPage>, SiteError> {
    paths.iter().map(|path| read_html_file(path)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_json_parses_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        fs::write(&a, r#"{"title": "Home"}"#).unwrap();
        fs::write(&b, "[1, 2, 3]").unwrap();

        let values = read_json(&[a, b]).unwrap();
        assert_eq!(values[0]["title"], "Home");
        assert_eq!(values[1], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn test_read_json_names_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();

        let err = read_json(&[bad.clone()]).unwrap_err();
        assert!(matches!(&err, SiteError::Json(path, _) if *path == bad));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn test_read_html_file_extracts_links() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("index.html");
        fs::write(
            &page,
            r#"<html><body>
                <a href="https://example.com/">Out</a>
                <a href="/about/">About</a>
            </body></html>"#,
        )
        .unwrap();

        let html = read_html_file(&page).unwrap();
        assert_eq!(html.path, page);
        assert_eq!(html.links.external.links, vec!["https://example.com/"]);
        assert_eq!(html.links.links, vec!["/about/"]);
        assert!(html.errors.is_empty());
        assert!(html.warnings.is_empty());
    }

    #[test]
    fn test_read_source_files_skips_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.md");
        let missing = dir.path().join("missing.md");
        let last = dir.path().join("last.md");
        fs::write(&first, "# One").unwrap();
        fs::write(&last, "# Two").unwrap();

        let mut seen = Vec::new();
        let read = read_source_files(&[first.clone(), missing, last.clone()], |path, content| {
            seen.push((path.to_path_buf(), content));
        });

        assert_eq!(read, 2);
        assert_eq!(
            seen,
            vec![(first, "# One".to_string()), (last, "# Two".to_string())]
        );
    }

    #[test]
    fn test_read_html_files_fails_on_missing_page() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.html");
        assert!(matches!(read_html_files(&[missing]), Err(SiteError::Io(..))));
    }
}
