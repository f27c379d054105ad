//! Image candidate extraction
//!
//! Seven independent heuristics run over each fetched page, in this order:
//!
//! 1. `<img>` elements: every `srcset` entry, `src` (unless a data URI), and
//!    `alt` when it looks like an image URL
//! 2. `<picture>` groups: every nested `<source srcset>` plus the nested `<img src>`
//! 3. Inline `style` attributes: every `url(...)` reference
//! 4. Lazy-loading `data-*` attributes whose value looks like an image
//! 5. `<video poster>` and `<audio cover>`, trusted without an extension check
//! 6. Raw HTML `background`/`background-image: url(...)` declarations
//! 7. Raw HTML text: JSON-like `"image": "...png"` pairs and bare absolute or
//!    protocol-relative image URLs
//!
//! Candidates are resolved against the page URL and collected in discovery
//! order with duplicates collapsed. The result is then filtered through
//! [`is_valid_image_url`].

use crate::url::{is_valid_image_url, looks_like_image, resolve};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

/// Lazy-loading attributes inspected by the data-attribute heuristic
const DATA_ATTRIBUTES: &[&str] = &[
    "data-src",
    "data-image",
    "data-background",
    "data-thumbnail",
    "data-thumb",
    "data-lazy-src",
];

static CSS_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url\(['"]?([^)'"]+)['"]?\)"#).unwrap());

static STYLE_BACKGROUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:background-image|background)\s*:\s*url\(['"]?([^)'"]+)['"]?\)"#).unwrap()
});

static JSON_IMAGE_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)"(?:image|url|src|thumbnail|thumb|poster|bg|background)[":\s]*"?\s*:\s*"([^"]+\.(?:jpg|jpeg|png|gif|webp|svg|bmp|ico))""#,
    )
    .unwrap()
});

static BARE_IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)"?((?:https?:)?//[^\s"'<>]+\.(?:jpg|jpeg|png|gif|webp|svg|bmp|ico))"?"#)
        .unwrap()
});

/// Page-scoped candidate collection
///
/// Keeps the order in which candidates were first discovered while
/// collapsing duplicates.
#[derive(Debug, Default, Clone)]
pub struct CandidateSet {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl CandidateSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resolved candidate; `None` and duplicates are ignored
    ///
    /// Returns true if the candidate was new.
    pub fn insert(&mut self, candidate: Option<String>) -> bool {
        match candidate {
            Some(url) if self.seen.insert(url.clone()) => {
                self.ordered.push(url);
                true
            }
            _ => false,
        }
    }

    /// Number of distinct candidates
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Whether no candidate has been collected
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Candidates in discovery order
    pub fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}

/// Extraction context shared by every heuristic for one page
struct Extraction<'a> {
    page_url: &'a Url,
    include_animated: bool,
    candidates: CandidateSet,
}

impl Extraction<'_> {
    fn add(&mut self, reference: &str) {
        let resolved = resolve(reference, self.page_url);
        self.candidates.insert(resolved);
    }

    fn add_if_image(&mut self, reference: &str) {
        if looks_like_image(reference, self.include_animated) {
            self.add(reference);
        }
    }

    fn add_srcset(&mut self, srcset: &str) {
        for url in parse_srcset(srcset) {
            self.add(url);
        }
    }
}

/// Runs all heuristics over a page and returns the valid image URLs
///
/// # Arguments
///
/// * `document` - The parsed page
/// * `raw_html` - The page source the document was parsed from
/// * `page_url` - URL of the page, used to resolve relative references
/// * `include_animated` - Whether `.gif` references count as images
///
/// # Returns
///
/// Distinct absolute image URLs, in the order the heuristics discovered them
pub fn extract_image_candidates(
    document: &Html,
    raw_html: &str,
    page_url: &Url,
    include_animated: bool,
) -> Vec<String> {
    let mut extraction = Extraction {
        page_url,
        include_animated,
        candidates: CandidateSet::new(),
    };

    extract_from_image_tags(document, &mut extraction);
    extract_from_picture_elements(document, &mut extraction);
    extract_from_inline_styles(document, &mut extraction);
    extract_from_data_attributes(document, &mut extraction);
    extract_from_media_elements(document, &mut extraction);
    extract_from_style_blocks(raw_html, &mut extraction);
    extract_from_text_patterns(raw_html, &mut extraction);

    extraction
        .candidates
        .into_vec()
        .into_iter()
        .filter(|url| is_valid_image_url(url, include_animated))
        .collect()
}

/// Splits a `srcset` value into its URLs, ignoring width/density descriptors
///
/// # Examples
///
/// ```
/// use pixthief::crawler::parse_srcset;
///
/// assert_eq!(parse_srcset("a.jpg 1x, b.jpg 2x"), vec!["a.jpg", "b.jpg"]);
/// ```
pub fn parse_srcset(srcset: &str) -> Vec<&str> {
    srcset
        .split(',')
        .filter_map(|entry| entry.split_whitespace().next())
        .collect()
}

/// Returns every `url(...)` reference in a CSS fragment
fn extract_css_urls(css: &str) -> Vec<&str> {
    CSS_URL
        .captures_iter(css)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .collect()
}

/// Selects every element in the document matching a CSS selector,
/// the root `<html>` element included
fn select_document<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Selects the descendants of `root` matching a CSS selector
fn select_all<'a>(root: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => root.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Non-empty attribute value
fn attr<'a>(element: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name).filter(|value| !value.is_empty())
}

fn extract_from_image_tags(document: &Html, extraction: &mut Extraction<'_>) {
    for img in select_document(document, "img") {
        if let Some(srcset) = attr(&img, "srcset") {
            extraction.add_srcset(srcset);
        }

        if let Some(src) = attr(&img, "src") {
            if !src.starts_with("data:") {
                extraction.add(src);
            }
        }

        if let Some(alt) = attr(&img, "alt") {
            extraction.add_if_image(alt);
        }
    }
}

fn extract_from_picture_elements(document: &Html, extraction: &mut Extraction<'_>) {
    for picture in select_document(document, "picture") {
        for source in select_all(picture, "source") {
            if let Some(srcset) = attr(&source, "srcset") {
                extraction.add_srcset(srcset);
            }
        }

        if let Some(img) = select_all(picture, "img").into_iter().next() {
            if let Some(src) = attr(&img, "src") {
                if !src.starts_with("data:") {
                    extraction.add(src);
                }
            }
        }
    }
}

fn extract_from_inline_styles(document: &Html, extraction: &mut Extraction<'_>) {
    for element in select_document(document, "[style]") {
        if let Some(style) = attr(&element, "style") {
            for url in extract_css_urls(style) {
                extraction.add(url);
            }
        }
    }
}

fn extract_from_data_attributes(document: &Html, extraction: &mut Extraction<'_>) {
    let selector = DATA_ATTRIBUTES
        .iter()
        .map(|name| format!("[{}]", name))
        .collect::<Vec<_>>()
        .join(", ");

    for element in select_document(document, &selector) {
        for name in DATA_ATTRIBUTES {
            if let Some(value) = attr(&element, name) {
                extraction.add_if_image(value);
            }
        }
    }
}

fn extract_from_media_elements(document: &Html, extraction: &mut Extraction<'_>) {
    for video in select_document(document, "video") {
        if let Some(poster) = attr(&video, "poster") {
            extraction.add(poster);
        }
    }

    for audio in select_document(document, "audio") {
        if let Some(cover) = attr(&audio, "cover") {
            extraction.add(cover);
        }
    }
}

fn extract_from_style_blocks(raw_html: &str, extraction: &mut Extraction<'_>) {
    for caps in STYLE_BACKGROUND.captures_iter(raw_html) {
        if let Some(m) = caps.get(1) {
            extraction.add_if_image(m.as_str().trim());
        }
    }
}

fn extract_from_text_patterns(raw_html: &str, extraction: &mut Extraction<'_>) {
    // JSON-like values are trusted: the pattern already requires an image extension
    for caps in JSON_IMAGE_VALUE.captures_iter(raw_html) {
        if let Some(m) = caps.get(1) {
            extraction.add(m.as_str().trim());
        }
    }

    for caps in BARE_IMAGE_URL.captures_iter(raw_html) {
        if let Some(m) = caps.get(1) {
            let url = m
                .as_str()
                .trim()
                .trim_end_matches(|c: char| matches!(c, '"' | '\'' | ',' | ';' | ':'));
            extraction.add_if_image(url);
        }
    }
}
