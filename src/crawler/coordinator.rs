//! Scrape coordinator - main run orchestration logic
//!
//! This module contains the run loop that ties the other components together:
//! - Fetching the start page once and naming the output folder after it
//! - Single-page runs (one fetch and extract pass)
//! - Domain runs (breadth-first over the frontier)
//! - Handing each page's images to the download sink
//! - Logging and counting per-page failures without stopping the run

use super::fetcher::Fetcher;
use super::frontier::Frontier;
use super::parser::{analyze_page, page_title};
use crate::config::{CrawlMode, ScraperConfig};
use crate::download::ImageSink;
use crate::output::determine_output_dir;
use crate::state::CrawlState;
use crate::url::{extract_host, normalize_page_url};
use crate::{PixError, Result};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use url::Url;

/// Summary of a finished run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Whether the run covered one page or a domain
    pub mode: CrawlMode,

    /// Folder the images were written to
    pub output_dir: PathBuf,

    /// Final counters
    pub state: CrawlState,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

/// The start page, fetched once before the run loop begins
struct StartPage {
    url: Url,
    content: Result<String>,
}

/// Main scraper structure
///
/// One `Scraper` performs one run. All run state (visited pages, downloaded
/// images, counters) is created inside [`Scraper::run`] and dropped with the
/// returned report.
pub struct Scraper {
    config: ScraperConfig,
    fetcher: Fetcher,
    start_page: Option<StartPage>,
}

impl Scraper {
    /// Creates a new scraper
    ///
    /// # Arguments
    ///
    /// * `config` - The resolved scraper configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Scraper)` - Ready to run
    /// * `Err(PixError)` - The HTTP client could not be built
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let fetcher = Fetcher::new(&config)?;

        Ok(Self {
            config,
            fetcher,
            start_page: None,
        })
    }

    /// Runs a complete scrape
    ///
    /// This is the main entry point. It will:
    /// 1. Fetch the start page and pick the output folder
    /// 2. Create the output folder
    /// 3. Process the start page alone, or crawl its domain
    /// 4. Return the counters collected along the way
    ///
    /// Page and image failures are logged and counted; only a failure to
    /// create the output folder ends the run early.
    pub async fn run(&mut self) -> Result<RunReport> {
        let started = Instant::now();
        self.log_run_settings();

        let output_dir = self.prepare_output_dir().await?;
        let mut sink = ImageSink::new(output_dir.clone(), &self.config);
        let mut state = CrawlState::new();

        match self.config.mode {
            CrawlMode::SinglePage => self.scrape_single_page(&mut sink, &mut state).await,
            CrawlMode::Domain => self.crawl_domain(&mut sink, &mut state).await,
        }

        Ok(RunReport {
            mode: self.config.mode,
            output_dir,
            state,
            elapsed: started.elapsed(),
        })
    }

    fn log_run_settings(&self) {
        match self.config.mode {
            CrawlMode::SinglePage => tracing::info!("Starting single-page image download..."),
            CrawlMode::Domain => tracing::info!("Starting domain-wide crawling..."),
        }

        if self.config.stealth {
            let delay_type = if self.config.randomize_delays {
                "randomized"
            } else {
                "fixed"
            };
            tracing::info!(
                "Stealth mode enabled with {}ms {} delay between requests",
                self.config.delay_ms,
                delay_type
            );
        }

        if let Some(format) = self.config.convert_to {
            tracing::info!("Converting all images to {} during download", format);
        }
    }

    /// Fetches the start page, derives the output folder, and creates it
    ///
    /// The fetched content (or failure) is kept for the first processed page.
    async fn prepare_output_dir(&mut self) -> Result<PathBuf> {
        let url = self.start_url();
        let content = self.fetcher.fetch_page(&url).await;

        let title = content.as_ref().ok().and_then(|html| page_title(html));
        tracing::debug!("Start page title: {:?}", title);

        let output_dir = determine_output_dir(
            self.config.output_dir.as_deref(),
            title.as_deref(),
            &self.config.url,
        );

        tokio::fs::create_dir_all(&output_dir)
            .await
            .map_err(|source| PixError::Write {
                path: output_dir.clone(),
                source,
            })?;
        tracing::info!("Saving images to {}", output_dir.display());

        self.start_page = Some(StartPage { url, content });
        Ok(output_dir)
    }

    async fn scrape_single_page(&mut self, sink: &mut ImageSink, state: &mut CrawlState) {
        let url = self.start_url();
        state.record_page();

        if let Err(e) = self.process_page(&url, sink, state).await {
            state.record_page_failure();
            tracing::error!("Failed to process {}: {}", url, e);
        }

        tracing::info!(
            "Download complete. Total images found: {}",
            state.images_found
        );
    }

    async fn crawl_domain(&mut self, sink: &mut ImageSink, state: &mut CrawlState) {
        let max_pages = self.config.max_pages;
        let start = self.start_url();
        tracing::info!(
            "Following links on {} (up to {} pages)",
            extract_host(&start).unwrap_or_default(),
            max_pages
        );
        let mut frontier = Frontier::new(start, max_pages);

        while let Some(page) = frontier.next_page() {
            tracing::info!(
                "[{}/{}] Crawling: {}",
                frontier.pages_processed(),
                max_pages,
                page
            );
            state.record_page();

            match self.process_page(&page, sink, state).await {
                Ok(links) => {
                    let added = frontier.enqueue_links(links);
                    tracing::debug!(
                        "Queued {} links from {} ({} waiting)",
                        added,
                        page,
                        frontier.queue_len()
                    );
                }
                Err(e) => {
                    state.record_page_failure();
                    tracing::warn!("Error processing page {}: {}", page, e);
                }
            }
        }

        tracing::info!(
            "Crawling complete. Processed {} pages. Total images found: {}",
            frontier.pages_processed(),
            state.images_found
        );
    }

    /// Fetches one page, downloads its images, and returns its links
    async fn process_page(
        &mut self,
        url: &Url,
        sink: &mut ImageSink,
        state: &mut CrawlState,
    ) -> Result<Vec<Url>> {
        let html = self.fetch(url).await?;
        let analysis = analyze_page(&html, url, self.config.include_animated_gifs);

        let total = state.add_images_found(analysis.images.len());
        tracing::info!(
            "Found {} images on this page (total so far: {})",
            analysis.images.len(),
            total
        );

        sink.download_all(&self.fetcher, &analysis.images, state).await;

        Ok(analysis.links)
    }

    /// Returns the page content, using the cached start page when it matches
    async fn fetch(&mut self, url: &Url) -> Result<String> {
        if self.start_page.as_ref().is_some_and(|start| &start.url == url) {
            if let Some(start) = self.start_page.take() {
                return start.content;
            }
        }

        self.fetcher.fetch_page(url).await
    }

    /// The start URL as tracked by the frontier (fragment removed)
    fn start_url(&self) -> Url {
        normalize_page_url(self.config.url.as_str()).unwrap_or_else(|| self.config.url.clone())
    }
}
