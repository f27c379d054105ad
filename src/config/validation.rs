use crate::download::sanitize_file_name;
use crate::ConfigError;
use std::path::{Path, PathBuf};
use url::Url;

/// Validates the target URL: absolute, HTTP or HTTPS, with a host
pub fn validate_url(url_str: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(url_str.trim())
        .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", url_str, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "'{}' must use http or https",
            url_str
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "'{}' has no host",
            url_str
        )));
    }

    Ok(url)
}

/// Validates the domain-mode page budget
pub fn validate_max_pages(max_pages: u32) -> Result<u32, ConfigError> {
    if max_pages < 1 {
        return Err(ConfigError::Validation(
            "max-pages must be a positive integer".to_string(),
        ));
    }
    Ok(max_pages)
}

/// Validates the base pacing delay
pub fn validate_delay(delay_ms: u64) -> Result<u64, ConfigError> {
    if delay_ms < 1 {
        return Err(ConfigError::Validation(
            "delay must be a positive number of milliseconds".to_string(),
        ));
    }
    Ok(delay_ms)
}

/// Validates the JPEG quality (1-100)
pub fn validate_jpeg_quality(quality: u32) -> Result<u8, ConfigError> {
    if !(1..=100).contains(&quality) {
        return Err(ConfigError::Validation(format!(
            "jpeg-quality must be between 1 and 100, got {}",
            quality
        )));
    }
    Ok(quality as u8)
}

/// Validates the request timeout
pub fn validate_timeout(timeout_secs: u64) -> Result<u64, ConfigError> {
    if timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout must be at least 1 second".to_string(),
        ));
    }
    Ok(timeout_secs)
}

/// Validates an output directory override
///
/// The final path component is sanitized of characters that are not allowed
/// in file names; parent components are kept as given.
pub fn validate_output_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| {
            ConfigError::Validation(format!(
                "output folder '{}' has no usable name",
                path.display()
            ))
        })?;

    Ok(path.with_file_name(sanitize_file_name(&name)))
}
