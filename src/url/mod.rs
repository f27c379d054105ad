//! URL handling module for PixThief
//!
//! This module provides reference resolution, page URL normalization, host
//! comparison for the crawl frontier, and image-reference classification.

mod domain;
mod image;
mod normalize;

// Re-export main functions
pub use domain::{extract_host, is_same_host};
pub use image::{is_valid_image_url, looks_like_image};
pub use normalize::{normalize_page_url, resolve};
