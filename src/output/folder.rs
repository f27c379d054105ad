//! Output folder naming
//!
//! When no folder is given on the command line, the folder is named after
//! the start page's title, falling back to the host and path.

use crate::download::sanitize_file_name;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use url::Url;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s-]").unwrap());

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Picks the output folder for a run
///
/// # Rules
///
/// 1. An explicit folder always wins
/// 2. Otherwise the start page title, if it sanitizes to a usable name
/// 3. Otherwise `<host>_<path_slug>`, or `<host>_images` for a root URL
///
/// # Arguments
///
/// * `explicit` - Folder from the configuration, already sanitized
/// * `title` - Title of the start page, if it was fetched and has one
/// * `start` - The start URL
pub fn determine_output_dir(explicit: Option<&Path>, title: Option<&str>, start: &Url) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }

    if let Some(name) = title.and_then(sanitize_title) {
        return PathBuf::from(name);
    }

    PathBuf::from(fallback_folder_name(start))
}

/// Turns a page title into a folder name
///
/// Titles of two characters or fewer are rejected. Everything except word
/// characters, whitespace and `-` is removed, whitespace runs become `_`,
/// and the result must be longer than three characters.
///
/// # Examples
///
/// ```
/// use pixthief::output::sanitize_title;
///
/// assert_eq!(sanitize_title("Cats & Dogs: Gallery!").as_deref(), Some("Cats_Dogs_Gallery"));
/// assert_eq!(sanitize_title("Hi"), None);
/// ```
pub fn sanitize_title(title: &str) -> Option<String> {
    if title.chars().count() <= 2 {
        return None;
    }

    let stripped = NON_WORD.replace_all(title, "");
    let name = WHITESPACE_RUN.replace_all(&stripped, "_").into_owned();

    (name.chars().count() > 3).then_some(name)
}

/// Folder name derived from the start URL
///
/// # Examples
///
/// ```
/// use pixthief::output::fallback_folder_name;
/// use url::Url;
///
/// let url = Url::parse("https://www.example.com/blog/post/").unwrap();
/// assert_eq!(fallback_folder_name(&url), "example.com_blog_post");
/// ```
pub fn fallback_folder_name(url: &Url) -> String {
    let host = url.host_str().unwrap_or("site");
    let host = host.strip_prefix("www.").unwrap_or(host);

    let slug = url.path().trim_matches('/').replace('/', "_");

    let name = if slug.is_empty() {
        format!("{}_images", host)
    } else {
        format!("{}_{}", host, slug)
    };

    sanitize_file_name(&name)
}
