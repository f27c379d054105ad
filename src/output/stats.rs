//! End-of-run statistics
//!
//! This module formats the counters collected during a run for display.

use crate::config::CrawlMode;
use crate::crawler::RunReport;

/// Share of found images that ended up on disk, in percent
pub fn write_rate(report: &RunReport) -> f64 {
    let found = report.state.images_found;
    if found == 0 {
        return 0.0;
    }
    (report.state.images_written() as f64 / found as f64) * 100.0
}

/// Renders the statistics block for a finished run
pub fn format_statistics(report: &RunReport) -> String {
    let state = &report.state;
    let mut lines = Vec::new();

    lines.push("=== Run Statistics ===".to_string());
    lines.push(String::new());

    lines.push("Overview:".to_string());
    lines.push(format!("  Output folder: {}", report.output_dir.display()));
    if report.mode == CrawlMode::Domain {
        lines.push(format!("  Pages processed: {}", state.pages_processed));
        lines.push(format!("  Pages failed: {}", state.pages_failed));
    }
    lines.push(format!("  Images found: {}", state.images_found));
    lines.push(format!("  Elapsed: {:.1}s", report.elapsed.as_secs_f64()));
    lines.push(String::new());

    lines.push("Images:".to_string());
    lines.push(format!("  Saved: {}", state.images_saved));
    if state.images_converted > 0 || state.conversion_fallbacks > 0 {
        lines.push(format!("  Converted: {}", state.images_converted));
        lines.push(format!(
            "  Saved unconverted (conversion failed): {}",
            state.conversion_fallbacks
        ));
    }
    lines.push(format!("  Duplicates skipped: {}", state.duplicates_skipped));
    lines.push(format!("  Failed: {}", state.images_failed));
    lines.push(String::new());

    lines.push(format!(
        "Write Rate: {:.1}% ({} / {} images written)",
        write_rate(report),
        state.images_written(),
        state.images_found
    ));

    lines.join("\n")
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(report: &RunReport) {
    println!("{}", format_statistics(report));
}
