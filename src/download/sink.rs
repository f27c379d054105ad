use super::convert::convert_image;
use super::filename::{apply_format_extension, file_name_from_url, unique_path};
use crate::config::{ConvertFormat, ScraperConfig};
use crate::crawler::Fetcher;
use crate::state::CrawlState;
use crate::{PixError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// What happened to one image candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Written as downloaded
    Saved(PathBuf),

    /// Re-encoded and written under the target format's extension
    Converted(PathBuf),

    /// Conversion failed; the original bytes were written under the target name
    ConversionFallback(PathBuf),

    /// Already downloaded earlier in this run
    Duplicate,
}

/// Writes downloaded images into the output folder
///
/// The sink owns the run-wide set of downloaded URLs, so an image referenced
/// from several pages is fetched once.
#[derive(Debug)]
pub struct ImageSink {
    output_dir: PathBuf,
    convert_to: Option<ConvertFormat>,
    jpeg_quality: u8,
    downloaded: HashSet<String>,
}

impl ImageSink {
    /// Creates a sink writing into `output_dir`
    pub fn new(output_dir: PathBuf, config: &ScraperConfig) -> Self {
        Self {
            output_dir,
            convert_to: config.convert_to,
            jpeg_quality: config.jpeg_quality,
            downloaded: HashSet::new(),
        }
    }

    /// Number of distinct URLs attempted so far
    pub fn attempted(&self) -> usize {
        self.downloaded.len()
    }

    /// Downloads every image of one page and records the outcomes
    ///
    /// Failures are logged and counted; they never stop the remaining
    /// downloads.
    pub async fn download_all(&mut self, fetcher: &Fetcher, urls: &[String], state: &mut CrawlState) {
        for url in urls {
            match self.download(fetcher, url).await {
                Ok(DownloadOutcome::Saved(path)) => {
                    state.images_saved += 1;
                    tracing::info!("[+] {} -> {}", url, display_name(&path));
                }
                Ok(DownloadOutcome::Converted(path)) => {
                    state.images_converted += 1;
                    tracing::info!("[+] {} -> {} (converted)", url, display_name(&path));
                }
                Ok(DownloadOutcome::ConversionFallback(path)) => {
                    state.conversion_fallbacks += 1;
                    tracing::warn!(
                        "[!] {} -> {} (conversion failed, saved as-is)",
                        url,
                        display_name(&path)
                    );
                }
                Ok(DownloadOutcome::Duplicate) => {
                    state.duplicates_skipped += 1;
                    tracing::debug!("Already downloaded {}", url);
                }
                Err(e) => {
                    state.images_failed += 1;
                    tracing::warn!("Failed to download {}: {}", url, e);
                }
            }
        }
    }

    /// Downloads one image unless it was already attempted this run
    ///
    /// The URL is marked as attempted before the request, so a failed image
    /// is not retried when another page references it.
    pub async fn download(&mut self, fetcher: &Fetcher, url: &str) -> Result<DownloadOutcome> {
        if !self.downloaded.insert(url.to_string()) {
            return Ok(DownloadOutcome::Duplicate);
        }

        if let Some(delay) = fetcher.policy().image_delay() {
            tracing::debug!("Delay: {}ms", delay.as_millis());
            tokio::time::sleep(delay).await;
        }

        let file_name = file_name_from_url(url);
        let target_name = match self.convert_to {
            Some(format) => apply_format_extension(&file_name, format),
            None => file_name,
        };
        let path = unique_path(&self.output_dir, &target_name);

        tracing::debug!("Fetching {}", url);
        let data = fetcher.fetch_bytes(url).await?;
        tracing::debug!("Got {} bytes from {}", data.len(), url);

        let Some(format) = self.convert_to else {
            write_file(&path, &data).await?;
            return Ok(DownloadOutcome::Saved(path));
        };

        match convert_image(&data, format, self.jpeg_quality) {
            Ok(encoded) => {
                write_file(&path, &encoded).await?;
                Ok(DownloadOutcome::Converted(path))
            }
            Err(e) => {
                tracing::warn!("Conversion of {} failed: {}", url, e);
                write_file(&path, &data).await?;
                Ok(DownloadOutcome::ConversionFallback(path))
            }
        }
    }
}

async fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    tokio::fs::write(path, data)
        .await
        .map_err(|source| PixError::Write {
            path: path.to_path_buf(),
            source,
        })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
