//! PixThief: a polite web image harvester
//!
//! This crate crawls a single page or a whole domain, discovers image references
//! through several heuristics (DOM attributes, CSS, raw page text), and downloads
//! them to disk, optionally re-encoding them to a common format.

pub mod config;
pub mod crawler;
pub mod download;
pub mod output;
pub mod state;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for PixThief operations
#[derive(Debug, Error)]
pub enum PixError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Rate limited (429) by {url}")]
    RateLimited { url: String },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Image conversion errors
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}

/// Result type alias for PixThief operations
pub type Result<T> = std::result::Result<T, PixError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{ConvertFormat, CrawlMode, ScraperConfig};
pub use crawler::{RunReport, Scraper};
pub use state::CrawlState;
