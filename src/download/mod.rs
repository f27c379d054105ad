//! Image download module
//!
//! This module handles:
//! - Deriving safe, collision-free local file names from image URLs
//! - Optional re-encoding into a common format
//! - Writing images to the output folder, once per URL per run

mod convert;
mod filename;
mod sink;

pub use convert::convert_image;
pub use filename::{apply_format_extension, file_name_from_url, sanitize_file_name, unique_path};
pub use sink::{DownloadOutcome, ImageSink};
