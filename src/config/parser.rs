use crate::config::types::{
    CrawlMode, RawOptions, ScraperConfig, DEFAULT_DELAY_MS, DEFAULT_JPEG_QUALITY,
    DEFAULT_MAX_PAGES, DEFAULT_TIMEOUT_SECS,
};
use crate::config::validation::{
    validate_delay, validate_jpeg_quality, validate_max_pages, validate_output_dir,
    validate_timeout, validate_url,
};
use crate::{ConfigError, ConfigResult};
use std::path::Path;

/// Loads a TOML options profile from the given path
///
/// The profile uses the same keys as the command line, in kebab-case:
///
/// ```toml
/// domain = true
/// max-pages = 50
/// stealth = true
/// convert-to = "png"
/// ```
///
/// # Arguments
///
/// * `path` - Path to the TOML profile
///
/// # Returns
///
/// * `Ok(RawOptions)` - Parsed, not yet validated, options
/// * `Err(ConfigError)` - Failed to read or parse the file
pub fn load_options_file(path: &Path) -> ConfigResult<RawOptions> {
    let content = std::fs::read_to_string(path)?;
    parse_options(&content)
}

/// Parses a TOML options profile from a string
pub fn parse_options(content: &str) -> ConfigResult<RawOptions> {
    Ok(toml::from_str(content)?)
}

/// Resolves raw options into a validated `ScraperConfig`
///
/// Delay semantics: an explicit `delay` turns on stealth pacing with a fixed
/// wait; `stealth` without a delay turns on randomized pacing around the
/// default delay.
///
/// # Returns
///
/// * `Ok(ScraperConfig)` - Options are complete and valid
/// * `Err(ConfigError)` - Missing or malformed URL, or an out-of-range value
pub fn resolve_options(raw: RawOptions) -> ConfigResult<ScraperConfig> {
    let url_str = raw
        .url
        .as_deref()
        .ok_or_else(|| ConfigError::InvalidUrl("a target URL is required".to_string()))?;
    let url = validate_url(url_str)?;

    let mut config = ScraperConfig::new(url);

    if raw.domain.unwrap_or(false) {
        config.mode = CrawlMode::Domain;
    }

    config.max_pages = validate_max_pages(raw.max_pages.unwrap_or(DEFAULT_MAX_PAGES))?;
    config.include_animated_gifs = raw.include_gifs.unwrap_or(false);

    match raw.delay {
        Some(delay) => {
            config.delay_ms = validate_delay(delay)?;
            config.stealth = true;
            config.randomize_delays = false;
        }
        None => {
            config.delay_ms = DEFAULT_DELAY_MS;
            config.stealth = raw.stealth.unwrap_or(false);
            config.randomize_delays = config.stealth;
        }
    }

    if let Some(format) = raw.convert_to.as_deref() {
        config.convert_to = Some(format.parse().map_err(ConfigError::Validation)?);
    }

    config.jpeg_quality = validate_jpeg_quality(
        raw.jpeg_quality
            .unwrap_or_else(|| u32::from(DEFAULT_JPEG_QUALITY)),
    )?;
    config.timeout_secs = validate_timeout(raw.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS))?;
    config.output_dir = raw.out.as_deref().map(validate_output_dir).transpose()?;
    config.verbose = raw.verbose.unwrap_or(false);

    Ok(config)
}
