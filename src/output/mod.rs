//! Output module for run results
//!
//! This module handles:
//! - Choosing the folder images are written to
//! - Formatting the end-of-run statistics

mod folder;
pub mod stats;

pub use folder::{determine_output_dir, fallback_folder_name, sanitize_title};
pub use stats::{format_statistics, print_statistics, write_rate};
