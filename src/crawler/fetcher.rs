//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for a run, including:
//! - Building the HTTP client (plain or stealth header profile)
//! - Fetching page HTML with one backoff-and-retry on rate limiting
//! - Fetching raw image bytes
//! - Mapping transport failures and error statuses to [`PixError`]

use super::delay::DelayPolicy;
use crate::config::ScraperConfig;
use crate::{PixError, Result};
use rand::seq::IndexedRandom;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, DNT, UPGRADE_INSECURE_REQUESTS};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use url::Url;

/// User agent sent when stealth mode is off
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Browser user agents, one of which is picked per run in stealth mode
pub const STEALTH_USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36 Edg/121.0.0.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

const STEALTH_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8";

const STEALTH_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Connection establishment timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Picks the user agent for a run
pub fn pick_user_agent(stealth: bool) -> &'static str {
    if !stealth {
        return DEFAULT_USER_AGENT;
    }

    STEALTH_USER_AGENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(DEFAULT_USER_AGENT)
}

/// Builds the HTTP client for a run
///
/// In stealth mode the client sends a randomly chosen browser user agent plus
/// `Accept`, `Accept-Language`, `DNT` and `Upgrade-Insecure-Requests`
/// headers. Otherwise it sends a single fixed browser user agent.
///
/// # Arguments
///
/// * `config` - The scraper configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &ScraperConfig) -> std::result::Result<Client, reqwest::Error> {
    let user_agent = pick_user_agent(config.stealth);
    tracing::debug!("Using user agent: {}", user_agent);

    let mut builder = Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(CONNECT_TIMEOUT)
        .gzip(true)
        .brotli(true)
        .deflate(true);

    if config.stealth {
        builder = builder.default_headers(stealth_headers());
    }

    builder.build()
}

fn stealth_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(STEALTH_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(STEALTH_ACCEPT_LANGUAGE));
    headers.insert(DNT, HeaderValue::from_static("1"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers
}

/// Page and image fetcher for a run
///
/// Owns the HTTP client and the pacing policy, so the rate-limit backoff
/// state is shared by every page request of the run.
pub struct Fetcher {
    client: Client,
    policy: DelayPolicy,
    pages_requested: u32,
}

impl Fetcher {
    /// Creates a fetcher from the scraper configuration
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = build_http_client(config)?;
        Ok(Self::with_client(client, DelayPolicy::from_config(config)))
    }

    /// Creates a fetcher from an existing client and policy
    pub fn with_client(client: Client, policy: DelayPolicy) -> Self {
        Self {
            client,
            policy,
            pages_requested: 0,
        }
    }

    /// Fetches a page body as text
    ///
    /// In stealth mode every page request after the first of the run waits
    /// for the pacing delay first.
    ///
    /// # Rate Limiting
    ///
    /// | Response | Action |
    /// |----------|--------|
    /// | 2xx | Reset backoff, return body |
    /// | 429 | Escalate backoff, wait `base * multiplier`, retry once |
    /// | 429 on retry | Escalate backoff again, fail with `RateLimited` |
    /// | Other status | Fail with `HttpStatus` |
    pub async fn fetch_page(&mut self, url: &Url) -> Result<String> {
        if self.pages_requested > 0 {
            if let Some(delay) = self.policy.page_delay() {
                tracing::debug!("Waiting {}ms before next request...", delay.as_millis());
                tokio::time::sleep(delay).await;
            }
        }
        self.pages_requested += 1;

        let mut response = self.send(url.as_str()).await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let wait = self.policy.on_rate_limited();
            tracing::warn!("Rate limited (429) by {}. Backing off for {:?}", url, wait);
            tokio::time::sleep(wait).await;

            response = self.send(url.as_str()).await?;

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                self.policy.on_rate_limited();
                tracing::warn!("Still rate limited by {}. Consider using longer delays", url);
                return Err(PixError::RateLimited {
                    url: url.to_string(),
                });
            }
        }

        let response = ensure_success(response)?;
        let body = response.text().await.map_err(|source| PixError::Http {
            url: url.to_string(),
            source,
        })?;

        self.policy.on_success();
        Ok(body)
    }

    /// Fetches the raw bytes of an image
    ///
    /// No retry is attempted; a non-success status fails the image.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = ensure_success(self.send(url).await?)?;

        let bytes = response.bytes().await.map_err(|source| PixError::Http {
            url: url.to_string(),
            source,
        })?;

        Ok(bytes.to_vec())
    }

    /// The pacing policy of this run
    pub fn policy(&self) -> &DelayPolicy {
        &self.policy
    }

    /// Number of page requests issued so far (retries not counted)
    pub fn pages_requested(&self) -> u32 {
        self.pages_requested
    }

    async fn send(&self, url: &str) -> Result<Response> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(|source| PixError::Http {
                url: url.to_string(),
                source,
            })
    }
}

fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    Err(PixError::HttpStatus {
        url: response.url().to_string(),
        status: status.as_u16(),
    })
}
