//! Report formatting and printing utilities.
//!
//! Every printer has a `_to` variant taking a writer so output can be
//! asserted in tests. Colours come from `colored` and honour `NO_COLOR`.

use std::{
    io::{self, Write},
    path::Path,
};

use colored::Colorize;

use crate::pipeline::{Plan, RunSummary};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Show `path` relative to `root` when it lives underneath it.
pub fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Print what the run is about to do to the destination file.
///
/// Printed unconditionally, whether or not the user is asked to confirm.
pub fn print_plan(plan: &Plan, root: &Path) {
    print_plan_to(plan, root, &mut io::stdout().lock());
}

pub fn print_plan_to<W: Write>(plan: &Plan, root: &Path, writer: &mut W) {
    let destination = display_path(&plan.destination, root);
    let action = if plan.destination_exists {
        "exists and will be overwritten".yellow()
    } else {
        "does not exist and will be created".normal()
    };
    let _ = writeln!(
        writer,
        "Found {} source {}. {} {}.",
        plan.sources.len(),
        if plan.sources.len() == 1 { "file" } else { "files" },
        destination.bold(),
        action
    );
}

pub fn print_skipped_warning(count: usize, verbose: bool) {
    print_skipped_warning_to(count, verbose, &mut io::stderr().lock());
}

pub fn print_skipped_warning_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 {
        let _ = writeln!(
            writer,
            "{} {} path(s) skipped due to access errors{}",
            "warning:".bold().yellow(),
            count,
            if verbose { "" } else { " (use -v for details)" }
        );
    }
}

pub fn print_success(summary: &RunSummary, root: &Path) {
    print_success_to(summary, root, &mut io::stdout().lock());
}

pub fn print_success_to<W: Write>(summary: &RunSummary, root: &Path, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Updated {} from {} source {}",
            display_path(&summary.destination, root),
            summary.extracted_count,
            if summary.extracted_count == 1 { "file" } else { "files" }
        )
        .green()
    );
    if let Some(scratch) = &summary.scratch_dir {
        let _ = writeln!(writer, "  Scratch directory kept at {}", scratch.display());
    }
}
