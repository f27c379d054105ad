//! Breadth-first crawl frontier
//!
//! This module handles:
//! - The FIFO queue of pages waiting to be processed
//! - The visited set (a page is processed at most once per run)
//! - The page budget (`max_pages` dequeues that reach processing)
//! - Restricting discovered links to the start page's host

use crate::url::is_same_host;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Frontier for a domain crawl
///
/// Pages are processed in discovery order. A page is marked visited when it
/// is dequeued, so a URL queued twice is only processed once and the
/// duplicate dequeue does not count against the budget.
#[derive(Debug)]
pub struct Frontier {
    /// The start URL; only links on its host are enqueued
    start: Url,

    /// Pages waiting to be processed
    queue: VecDeque<Url>,

    /// Normalized URLs already dequeued for processing
    visited: HashSet<String>,

    /// Maximum number of pages to process
    max_pages: u32,

    /// Pages handed out so far
    pages_processed: u32,
}

impl Frontier {
    /// Creates a frontier seeded with the start URL
    pub fn new(start: Url, max_pages: u32) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(start.clone());

        Self {
            start,
            queue,
            visited: HashSet::new(),
            max_pages,
            pages_processed: 0,
        }
    }

    /// Takes the next unvisited page, or `None` when the crawl is over
    ///
    /// The crawl is over when the queue is exhausted or `max_pages` pages
    /// have been handed out. Already visited entries are discarded without
    /// counting against the budget.
    pub fn next_page(&mut self) -> Option<Url> {
        while self.pages_processed < self.max_pages {
            let url = self.queue.pop_front()?;

            if !self.visited.insert(url.to_string()) {
                tracing::trace!("Skipping already visited page {}", url);
                continue;
            }

            self.pages_processed += 1;
            return Some(url);
        }

        None
    }

    /// Appends same-host links that have not been visited yet
    ///
    /// Returns the number of links enqueued.
    pub fn enqueue_links<I>(&mut self, links: I) -> usize
    where
        I: IntoIterator<Item = Url>,
    {
        let mut added = 0;

        for link in links {
            if !is_same_host(&link, &self.start) {
                continue;
            }
            if self.is_visited(&link) {
                continue;
            }
            self.queue.push_back(link);
            added += 1;
        }

        added
    }

    /// Number of pages handed out for processing
    pub fn pages_processed(&self) -> u32 {
        self.pages_processed
    }

    /// Number of entries waiting in the queue (may include duplicates)
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Whether a normalized page URL has already been processed
    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }
}
