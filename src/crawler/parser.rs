//! HTML page analysis
//!
//! One parse of a fetched page yields everything the crawl needs from it:
//! - The page title (used to name the output folder)
//! - The image candidates (see [`super::extractor`])
//! - The hyperlinks to consider for the crawl frontier
//!
//! [`Html`] is not `Send`, so the document is parsed and dropped inside
//! [`analyze_page`] and only owned data crosses an `.await`.

use super::extractor::extract_image_candidates;
use crate::url::{normalize_page_url, resolve};
use scraper::{Html, Selector};
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct PageAnalysis {
    /// The page title (from the first `<title>` tag), trimmed
    pub title: Option<String>,

    /// Distinct valid image URLs, in discovery order
    pub images: Vec<String>,

    /// Normalized http(s) links found in `<a href>` elements
    pub links: Vec<Url>,
}

/// Parses a page and extracts its title, images and links
///
/// # Arguments
///
/// * `html` - The page body
/// * `page_url` - The URL the page was fetched from
/// * `include_animated` - Whether `.gif` references count as images
///
/// # Example
///
/// ```
/// use pixthief::crawler::analyze_page;
/// use url::Url;
///
/// let html = r#"<html><head><title>Cats</title></head><body><img src="/a.png"><a href="/next">Next</a></body></html>"#;
/// let page = Url::parse("https://example.com/").unwrap();
/// let analysis = analyze_page(html, &page, false);
/// assert_eq!(analysis.title.as_deref(), Some("Cats"));
/// assert_eq!(analysis.images, vec!["https://example.com/a.png".to_string()]);
/// assert_eq!(analysis.links[0].as_str(), "https://example.com/next");
/// ```
pub fn analyze_page(html: &str, page_url: &Url, include_animated: bool) -> PageAnalysis {
    let document = Html::parse_document(html);

    PageAnalysis {
        title: extract_title(&document),
        images: extract_image_candidates(&document, html, page_url, include_animated),
        links: extract_links(&document, page_url),
    }
}

/// Extracts only the title of a page
pub fn page_title(html: &str) -> Option<String> {
    extract_title(&Html::parse_document(html))
}

fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Resolves every `<a href>` against the page and keeps normalized http(s) URLs
///
/// Empty hrefs are skipped. Fragments are dropped, so in-page anchors
/// collapse onto the page itself.
fn extract_links(document: &Html, page_url: &Url) -> Vec<Url> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve(href, page_url))
        .filter_map(|absolute| normalize_page_url(&absolute))
        .collect()
}
