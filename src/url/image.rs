use url::{ParseError, Url};

/// Image extensions accepted by default
const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp", ".svg", ".bmp", ".ico"];

/// Extension added when animated GIFs are included
const ANIMATED_EXTENSION: &str = ".gif";

/// Checks whether a (lowercase) path ends with an accepted image extension
fn has_image_extension(path: &str, include_animated: bool) -> bool {
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
        || (include_animated && path.ends_with(ANIMATED_EXTENSION))
}

/// Cheap pre-filter: does this string look like it references an image?
///
/// Strips the query string, lowercases, and checks the extension. No URL
/// parsing happens here, so relative references and bare text work too.
///
/// # Examples
///
/// ```
/// use pixthief::url::looks_like_image;
///
/// assert!(looks_like_image("/img/Photo.JPG?w=200", false));
/// assert!(!looks_like_image("/anim.gif", false));
/// assert!(looks_like_image("/anim.gif", true));
/// ```
pub fn looks_like_image(url: &str, include_animated: bool) -> bool {
    if url.is_empty() {
        return false;
    }

    let lowered = url.to_lowercase();
    let without_query = lowered.split('?').next().unwrap_or_default();
    has_image_extension(without_query, include_animated)
}

/// Final validity filter applied to every candidate before download
///
/// Absolute URLs must be HTTP(S) and their path must end in an accepted
/// extension; relative references are checked as plain text. Malformed input
/// is rejected.
pub fn is_valid_image_url(url: &str, include_animated: bool) -> bool {
    if url.is_empty() {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => {
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return false;
            }
            has_image_extension(&parsed.path().to_lowercase(), include_animated)
        }
        Err(ParseError::RelativeUrlWithoutBase) => {
            has_image_extension(&url.to_lowercase(), include_animated)
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_image_extensions() {
        for name in [
            "a.jpg", "a.jpeg", "a.png", "a.webp", "a.svg", "a.bmp", "a.ico",
        ] {
            assert!(looks_like_image(name, false), "{} should match", name);
        }
    }

    #[test]
    fn test_looks_like_image_case_insensitive() {
        assert!(looks_like_image("HTTPS://A.TEST/PHOTO.PNG", false));
    }

    #[test]
    fn test_looks_like_image_strips_query() {
        assert!(looks_like_image("https://a.test/p.webp?w=100&h=50", false));
        assert!(!looks_like_image("https://a.test/p?img=x.png", false));
    }

    #[test]
    fn test_looks_like_image_gif_toggle() {
        assert!(!looks_like_image("https://a.test/anim.gif", false));
        assert!(looks_like_image("https://a.test/anim.gif", true));
    }

    #[test]
    fn test_looks_like_image_rejects_non_images() {
        assert!(!looks_like_image("", false));
        assert!(!looks_like_image("https://a.test/page.html", false));
        assert!(!looks_like_image("a photo of a cat", false));
    }

    #[test]
    fn test_valid_image_absolute() {
        assert!(is_valid_image_url("https://a.test/a.jpg", false));
        assert!(is_valid_image_url("http://a.test/a.JPEG?x=1", false));
    }

    #[test]
    fn test_valid_image_rejects_other_schemes() {
        assert!(!is_valid_image_url("ftp://a.test/a.jpg", false));
        assert!(!is_valid_image_url("data:image/png;base64,AAAA.png", false));
        assert!(!is_valid_image_url("file:///tmp/a.png", false));
    }

    #[test]
    fn test_valid_image_relative() {
        assert!(is_valid_image_url("img/a.png", false));
        assert!(!is_valid_image_url("img/a.gif", false));
        assert!(is_valid_image_url("img/a.gif", true));
    }

    #[test]
    fn test_valid_image_malformed_rejected() {
        assert!(!is_valid_image_url("", false));
        assert!(!is_valid_image_url("http://[bad/a.png", false));
    }
}
