//! State module for tracking run progress
//!
//! `CrawlState` holds the per-run counters (pages processed, images found,
//! download outcomes). The visited and downloaded sets live with the
//! components that own them: the crawl frontier and the image sink.

mod crawl_state;

pub use crawl_state::CrawlState;
