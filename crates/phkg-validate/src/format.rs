//! Human-readable rendering of validation reports.
//!
//! Rendering is pure: it never changes a verdict.

use std::fmt::Write as _;

use crate::report::{CollectionReport, DatasetReport};

/// How much detail to render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Status line and per-collection counts.
    #[default]
    Summary,
    /// Additionally every failing item and each of its errors.
    Detailed,
}

impl Verbosity {
    pub fn from_verbose_flag(verbose: bool) -> Self {
        if verbose {
            Self::Detailed
        } else {
            Self::Summary
        }
    }
}

/// Render a dataset report.
pub fn render_dataset(report: &DatasetReport, verbosity: Verbosity) -> String {
    let mut out = status_line(report.success, report.total, report.total_valid, report.total_invalid);
    for collection in report.reports() {
        write_collection(&mut out, collection, verbosity);
    }
    out
}

/// Render a single collection report.
pub fn render_collection(report: &CollectionReport, verbosity: Verbosity) -> String {
    let mut out = status_line(report.is_success(), report.total, report.valid, report.invalid);
    write_collection(&mut out, report, verbosity);
    out
}

fn status_line(success: bool, total: usize, valid: usize, invalid: usize) -> String {
    if success {
        format!("Validation PASSED: {valid} items valid\n")
    } else {
        format!("Validation FAILED: {invalid} of {total} items invalid\n")
    }
}

fn write_collection(out: &mut String, report: &CollectionReport, verbosity: Verbosity) {
    // Writing to a String cannot fail.
    let _ = writeln!(
        out,
        "  {}: {} valid, {} invalid ({} total)",
        report.schema, report.valid, report.invalid, report.total
    );
    if verbosity == Verbosity::Summary {
        return;
    }
    for failure in &report.failures {
        let _ = writeln!(out, "    [{}] {}", failure.index, failure.id);
        for error in &failure.errors {
            let _ = writeln!(out, "      {error}");
        }
    }
}
