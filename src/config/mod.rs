//! Configuration module for PixThief
//!
//! Options arrive from the command line and, optionally, a TOML profile. They
//! are overlaid as `RawOptions` and resolved once into an immutable
//! `ScraperConfig`.
//!
//! # Example
//!
//! ```no_run
//! use pixthief::config::{load_options_file, resolve_options};
//! use std::path::Path;
//!
//! let raw = load_options_file(Path::new("pixthief.toml")).unwrap();
//! let config = resolve_options(raw).unwrap();
//! println!("Crawling up to {} pages", config.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ConvertFormat, CrawlMode, RawOptions, ScraperConfig, DEFAULT_DELAY_MS, DEFAULT_JPEG_QUALITY,
    DEFAULT_MAX_PAGES, DEFAULT_TIMEOUT_SECS,
};

// Re-export parser functions
pub use parser::{load_options_file, parse_options, resolve_options};
