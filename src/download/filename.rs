use crate::config::ConvertFormat;
use std::path::{Path, PathBuf};
use url::Url;

/// Name used when a URL has no usable last path segment
const FALLBACK_STEM: &str = "image";

/// Extension appended to names that have none
const FALLBACK_EXTENSION: &str = "jpg";

/// Characters that are not allowed in file names on common filesystems
const INVALID_FILE_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replaces characters that cannot appear in a file name with `_`
///
/// # Examples
///
/// ```
/// use pixthief::download::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("a:b?.png"), "a_b_.png");
/// ```
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_control() || INVALID_FILE_NAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Derives a local file name from an image URL
///
/// # Naming Rules
///
/// 1. Take the last path segment, percent-decoded
/// 2. An empty segment becomes `image`
/// 3. A name without an extension gets `.jpg`
/// 4. Characters invalid in file names are replaced with `_`
///
/// Unparseable URLs yield `image.jpg`.
///
/// # Examples
///
/// ```
/// use pixthief::download::file_name_from_url;
///
/// assert_eq!(file_name_from_url("https://a.test/img/My%20Cat.png?w=2"), "My Cat.png");
/// assert_eq!(file_name_from_url("https://a.test/"), "image.jpg");
/// ```
pub fn file_name_from_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return format!("{}.{}", FALLBACK_STEM, FALLBACK_EXTENSION);
    };

    let segment = parsed
        .path_segments()
        .and_then(|segments| segments.last())
        .unwrap_or_default();

    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());

    let mut name = if decoded.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        decoded
    };

    if Path::new(&name).extension().is_none() {
        name.push('.');
        name.push_str(FALLBACK_EXTENSION);
    }

    sanitize_file_name(&name)
}

/// Swaps the extension of a file name for the conversion target's
///
/// # Examples
///
/// ```
/// use pixthief::config::ConvertFormat;
/// use pixthief::download::apply_format_extension;
///
/// assert_eq!(apply_format_extension("photo.webp", ConvertFormat::Png), "photo.png");
/// ```
pub fn apply_format_extension(file_name: &str, format: ConvertFormat) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_STEM.to_string());

    format!("{}.{}", stem, format.extension())
}

/// Returns a path in `dir` for `file_name` that does not exist yet
///
/// On collision, `_1`, `_2`, ... is inserted before the extension until a
/// free name is found.
pub fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = name
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (1u32..)
        .map(|counter| dir.join(format!("{}_{}{}", stem, counter, extension)))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}
