/// Run-scoped counters for a single scrape
///
/// A fresh `CrawlState` is created at the start of every top-level run
/// (single page or domain); nothing here outlives the run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlState {
    /// Pages dequeued and processed (including pages whose fetch failed)
    pub pages_processed: u32,

    /// Pages whose fetch or processing failed
    pub pages_failed: u32,

    /// Valid image candidates found, summed over all pages
    pub images_found: u64,

    /// Images written to disk as downloaded
    pub images_saved: u64,

    /// Images written after a successful format conversion
    pub images_converted: u64,

    /// Images whose conversion failed and were written unchanged
    pub conversion_fallbacks: u64,

    /// Candidates skipped because they were already downloaded this run
    pub duplicates_skipped: u64,

    /// Images that could not be fetched or written
    pub images_failed: u64,
}

impl CrawlState {
    /// Creates a zeroed state
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a page that was dequeued for processing
    pub fn record_page(&mut self) {
        self.pages_processed += 1;
    }

    /// Records a page that could not be fetched or processed
    pub fn record_page_failure(&mut self) {
        self.pages_failed += 1;
    }

    /// Adds the number of valid candidates found on one page
    ///
    /// Returns the running total.
    pub fn add_images_found(&mut self, count: usize) -> u64 {
        self.images_found += count as u64;
        self.images_found
    }

    /// Total number of image files written, converted or not
    pub fn images_written(&self) -> u64 {
        self.images_saved + self.images_converted + self.conversion_fallbacks
    }
}
