//! Output formatting and display for pdfsplit.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - Progress indicators
//! - Split plans and summary reports
//!
//! # Examples
//!
//! ```no_run
//! use pdfsplit::output::OutputFormatter;
//! use pdfsplit::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Splitting report.pdf");
//! formatter.success("Split completed successfully");
//! # }
//! ```

pub mod formatter;
pub mod progress;

pub use formatter::{MessageLevel, OutputFormatter};
pub use progress::{ProgressBar, ProgressStyle};

use crate::split::{SplitPlan, SplitReport};
use crate::utils::format_file_size;

/// Display a dry-run plan.
pub fn display_plan(formatter: &OutputFormatter, plan: &SplitPlan) {
    for rejected in &plan.rejected {
        formatter.rejected_token(rejected);
    }

    formatter.section(&format!(
        "Would create {} file(s) from {} segment(s):",
        plan.outputs.len(),
        plan.segment_count
    ));

    for (i, planned) in plan.outputs.iter().enumerate() {
        formatter.list_item(
            i + 1,
            &format!(
                "pages {} → {} ({} segment(s))",
                planned.range, planned.name, planned.segment_count
            ),
        );
    }
}

/// Display the summary of a finished split.
pub fn display_report(formatter: &OutputFormatter, report: &SplitReport) {
    if let Some(mismatch) = &report.page_mismatch {
        formatter.warning(&format!(
            "Found {} stream segment(s) but the page tree lists {} page(s); \
             segment numbers may not match page numbers",
            mismatch.segment_count, mismatch.page_count
        ));
    }

    for failure in &report.failures {
        formatter.error(&format!(
            "Pages {} ({}) failed: {}",
            failure.range, failure.name, failure.reason
        ));
    }

    let total: usize = report.outputs.iter().map(|o| o.size).sum();
    formatter.blank_line();
    if report.failures.is_empty() {
        formatter.success(&format!(
            "Created {} file(s), {}",
            report.outputs.len(),
            format_file_size(total as u64)
        ));
    } else {
        formatter.warning(&format!(
            "Created {} of {} file(s)",
            report.outputs.len(),
            report.outputs.len() + report.failures.len()
        ));
    }
}
