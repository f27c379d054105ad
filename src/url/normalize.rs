use url::Url;

/// Resolves a reference found in a page to an absolute URL string
///
/// # Resolution Rules
///
/// 1. Trim surrounding whitespace; an empty reference resolves to nothing
/// 2. A reference that already parses as an absolute URL is returned unchanged
/// 3. Anything else is joined onto the page URL with standard relative
///    resolution (`img/a.png`, `/a.png`, `//cdn.host/a.png`, `../a.png`)
///
/// Never fails loudly: a reference that cannot be resolved returns `None` and
/// is simply discarded by callers.
///
/// # Arguments
///
/// * `reference` - Raw attribute value or text match
/// * `base` - URL of the page the reference was found in
///
/// # Examples
///
/// ```
/// use pixthief::url::resolve;
/// use url::Url;
///
/// let base = Url::parse("https://a.test/x/page").unwrap();
/// assert_eq!(resolve("img/a.jpg", &base).as_deref(), Some("https://a.test/x/img/a.jpg"));
/// assert_eq!(resolve("https://cdn.test/b.png", &base).as_deref(), Some("https://cdn.test/b.png"));
/// ```
pub fn resolve(reference: &str, base: &Url) -> Option<String> {
    let reference = reference.trim();

    if reference.is_empty() {
        return None;
    }

    if Url::parse(reference).is_ok() {
        return Some(reference.to_string());
    }

    base.join(reference).ok().map(|url| url.to_string())
}

/// Normalizes an absolute page URL for frontier bookkeeping
///
/// Only HTTP(S) URLs are accepted. The fragment is dropped; scheme, host,
/// port, path and query are kept as parsed.
///
/// # Returns
///
/// * `Some(Url)` - The normalized page URL
/// * `None` - The input is not an absolute HTTP(S) URL
///
/// # Examples
///
/// ```
/// use pixthief::url::normalize_page_url;
///
/// let url = normalize_page_url("https://a.test/gallery?page=2#top").unwrap();
/// assert_eq!(url.as_str(), "https://a.test/gallery?page=2");
/// ```
pub fn normalize_page_url(url_str: &str) -> Option<Url> {
    let mut url = Url::parse(url_str).ok()?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);
    Some(url)
}
