// src/checker/html.rs
// =============================================================================
// This module extracts links from generated HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Pages come straight from the build output directory, so there is no base
// URL: relative hrefs are internal links, absolute http(s) ones are external
// and are what the link checker probes.
// =============================================================================

use scraper::{Html, Selector};
use serde::Serialize;
use std::collections::HashSet;
use url::Url;

/// Links pointing outside the site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExternalLinks {
    pub links: Vec<String>,
    pub images: Vec<String>,
    pub mailto: Vec<String>,
}

/// Everything link-shaped found in one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    /// Internal `<a href>` targets (relative or root-relative paths)
    pub links: Vec<String>,
    /// Internal `<img src>` targets
    pub images: Vec<String>,
    /// `<video src>` and `<video><source src>` targets, as written
    pub videos: Vec<String>,
    /// `id` attributes, i.e. the fragments this page can be linked to
    pub anchors: Vec<String>,
    /// `#fragment` hrefs pointing into the same page
    pub anchor_links: Vec<String>,
    pub external: ExternalLinks,
}

// How a single href/src value should be treated
#[derive(Debug, PartialEq, Eq)]
enum LinkKind {
    External(String),
    Mailto(String),
    Anchor(String),
    Internal(String),
    Skip,
}

/// Extracts anchors, images and ids from HTML content.
///
/// Example:
///   html = `<a href="https://rust-lang.org">Rust</a><a href="/docs">Docs</a>`
///   external.links = ["https://rust-lang.org/"], links = ["/docs"]
pub fn extract_page_links(html: &str) -> PageLinks {
    let document = Html::parse_document(html);

    // These selectors are constants and known to be valid
    let anchor_selector = Selector::parse("a[href]").expect("valid selector");
    let image_selector = Selector::parse("img[src]").expect("valid selector");
    let video_selector = Selector::parse("video[src], video source[src]").expect("valid selector");
    let id_selector = Selector::parse("[id]").expect("valid selector");

    let mut page = PageLinks::default();

    for element in document.select(&anchor_selector) {
        if let Some(href) = element.value().attr("href") {
            match classify(href) {
                LinkKind::External(url) => page.external.links.push(url),
                LinkKind::Mailto(address) => page.external.mailto.push(address),
                LinkKind::Anchor(fragment) => page.anchor_links.push(fragment),
                LinkKind::Internal(path) => page.links.push(path),
                LinkKind::Skip => {}
            }
        }
    }

    for element in document.select(&image_selector) {
        if let Some(src) = element.value().attr("src") {
            match classify(src) {
                LinkKind::External(url) => page.external.images.push(url),
                LinkKind::Internal(path) => page.images.push(path),
                _ => {}
            }
        }
    }

    page.videos = document
        .select(&video_selector)
        .filter_map(|element| element.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(str::to_string)
        .collect();

    page.anchors = document
        .select(&id_selector)
        .filter_map(|element| element.value().attr("id"))
        .map(str::to_string)
        .collect();

    page
}

/// Every external link and image across pages, deduplicated, first-seen order.
pub fn collect_external_links<'a, I>(pages: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a PageLinks>,
{
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for page in pages {
        for url in page.external.links.iter().chain(&page.external.images) {
            if seen.insert(url.as_str()) {
                urls.push(url.clone());
            }
        }
    }

    urls
}

fn classify(raw: &str) -> LinkKind {
    let href = raw.trim();
    if href.is_empty() {
        return LinkKind::Skip;
    }

    if let Some(fragment) = href.strip_prefix('#') {
        return LinkKind::Anchor(fragment.to_string());
    }

    // Protocol-relative links get https, which is what a browser on an
    // https site would use
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };

    match Url::parse(&absolute) {
        Ok(url) => match url.scheme() {
            "http" | "https" => LinkKind::External(url.to_string()),
            "mailto" => LinkKind::Mailto(url.path().to_string()),
            // javascript:, tel:, data:, ...
            _ => LinkKind::Skip,
        },
        // Not absolute: a path inside the site
        Err(_) => LinkKind::Internal(href.to_string()),
    }
}
