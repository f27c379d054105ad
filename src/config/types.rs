use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

/// Default page budget for domain crawls
pub const DEFAULT_MAX_PAGES: u32 = 100;

/// Default pacing delay between requests (milliseconds)
pub const DEFAULT_DELAY_MS: u64 = 1000;

/// Default JPEG quality used when converting to JPEG
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Default overall request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Whether a run covers one page or a whole domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlMode {
    /// Fetch and harvest exactly one page
    SinglePage,
    /// Breadth-first crawl of every same-host page reachable from the start URL
    Domain,
}

/// Target format for image conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertFormat {
    Jpg,
    Png,
    Gif,
}

impl ConvertFormat {
    /// File extension (without the dot) written for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
        }
    }
}

impl fmt::Display for ConvertFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension().to_uppercase())
    }
}

impl FromStr for ConvertFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "png" => Ok(Self::Png),
            "gif" => Ok(Self::Gif),
            other => Err(format!(
                "unsupported conversion format '{}' (use jpg, png, or gif)",
                other
            )),
        }
    }
}

/// Fully resolved scraper configuration
///
/// Built once from the command line and optional config file, then shared
/// read-only by every component of a run.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Page the run starts from
    pub url: Url,

    /// Single page or whole-domain crawl
    pub mode: CrawlMode,

    /// Explicit output directory; derived from the page when absent
    pub output_dir: Option<PathBuf>,

    /// Maximum number of pages processed in domain mode
    pub max_pages: u32,

    /// Accept `.gif` references as images
    pub include_animated_gifs: bool,

    /// Pace requests and send browser-like headers
    pub stealth: bool,

    /// Jitter the pacing delay instead of waiting a fixed time
    pub randomize_delays: bool,

    /// Base pacing delay (milliseconds)
    pub delay_ms: u64,

    /// Re-encode every downloaded image to this format
    pub convert_to: Option<ConvertFormat>,

    /// Quality (1-100) used when converting to JPEG
    pub jpeg_quality: u8,

    /// Overall timeout applied to every request (seconds)
    pub timeout_secs: u64,

    /// Emit detailed diagnostics
    pub verbose: bool,
}

impl ScraperConfig {
    /// Creates a single-page configuration with default settings
    pub fn new(url: Url) -> Self {
        Self {
            url,
            mode: CrawlMode::SinglePage,
            output_dir: None,
            max_pages: DEFAULT_MAX_PAGES,
            include_animated_gifs: false,
            stealth: false,
            randomize_delays: false,
            delay_ms: DEFAULT_DELAY_MS,
            convert_to: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            verbose: false,
        }
    }
}

/// Unresolved options as they arrive from a TOML profile or the command line
///
/// Every field is optional so that layers can be overlaid before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawOptions {
    pub url: Option<String>,
    pub domain: Option<bool>,
    pub out: Option<PathBuf>,
    pub max_pages: Option<u32>,
    pub include_gifs: Option<bool>,
    pub stealth: Option<bool>,
    pub delay: Option<u64>,
    pub convert_to: Option<String>,
    pub jpeg_quality: Option<u32>,
    pub timeout: Option<u64>,
    pub verbose: Option<bool>,
}

impl RawOptions {
    /// Overlays `other` on top of `self`; values present in `other` win
    pub fn overlay(self, other: RawOptions) -> RawOptions {
        RawOptions {
            url: other.url.or(self.url),
            domain: other.domain.or(self.domain),
            out: other.out.or(self.out),
            max_pages: other.max_pages.or(self.max_pages),
            include_gifs: other.include_gifs.or(self.include_gifs),
            stealth: other.stealth.or(self.stealth),
            delay: other.delay.or(self.delay),
            convert_to: other.convert_to.or(self.convert_to),
            jpeg_quality: other.jpeg_quality.or(self.jpeg_quality),
            timeout: other.timeout.or(self.timeout),
            verbose: other.verbose.or(self.verbose),
        }
    }
}
