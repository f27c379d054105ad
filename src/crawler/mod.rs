//! Crawler module for page fetching and image discovery
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with rate-limit backoff
//! - Request pacing (fixed or humanized delays)
//! - HTML analysis: title, image candidates, links
//! - The breadth-first frontier for domain runs
//! - Overall run coordination

mod coordinator;
pub mod delay;
mod extractor;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{RunReport, Scraper};
pub use delay::{compute_delay, Backoff, DelayPolicy};
pub use extractor::{extract_image_candidates, parse_srcset, CandidateSet};
pub use fetcher::{build_http_client, pick_user_agent, Fetcher, DEFAULT_USER_AGENT, STEALTH_USER_AGENTS};
pub use frontier::Frontier;
pub use parser::{analyze_page, page_title, PageAnalysis};

use crate::config::ScraperConfig;
use crate::Result;

/// Runs a complete scrape with the given configuration
///
/// Convenience wrapper around [`Scraper::new`] and [`Scraper::run`].
///
/// # Returns
///
/// * `Ok(RunReport)` - The run finished (possibly with per-page or per-image failures)
/// * `Err(PixError)` - The run could not start
pub async fn scrape(config: ScraperConfig) -> Result<RunReport> {
    Scraper::new(config)?.run().await
}
