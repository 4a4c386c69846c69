//! CLI output formatting.
//!
//! Progress and warnings go to stdout; fatal errors are printed by `main`
//! on stderr. Each kind of line has a `format_*` function (pure, returns
//! strings) and a `print_*` wrapper that does the I/O, so tests can assert
//! on output without capturing stdout.
//!
//! ## Check output
//!
//! ```text
//! Entries
//! 001 example-1
//!     Source: entries/example-1/
//! 002 example-2
//!     Source: entries/example-2/
//!
//! Warnings
//! WARNING: Skipping entry 'broken: missing command.sh'
//! ```

use crate::pipeline::BuildReport;
use crate::scan::Gallery;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{pos:0>3}")
}

/// The per-entry skip warning. The `'name: reason'` shape is load-bearing:
/// users grep for the entry name to find out why it vanished.
pub fn format_warning(name: &str, reason: &str) -> String {
    format!("WARNING: Skipping entry '{name}: {reason}'")
}

pub fn print_warning(name: &str, reason: &str) {
    println!("{}", format_warning(name, reason));
}

/// An indented sub-step line under the current entry.
pub fn print_step(step: &str) {
    println!("  {step}");
}

pub fn print_line(line: &str) {
    println!("{line}");
}

/// Format the `check` report: discovered entries with source paths, then
/// warnings for everything that failed validation.
pub fn format_scan_report(gallery: &Gallery) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Entries".to_string());
    for (i, entry) in gallery.entries.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), entry.name));
        lines.push(format!("    Source: {}/", entry.path.display()));
    }

    if !gallery.rejected.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for (name, reason) in &gallery.rejected {
            lines.push(format_warning(name, reason));
        }
    }

    lines
}

pub fn print_scan_report(gallery: &Gallery) {
    for line in format_scan_report(gallery) {
        println!("{line}");
    }
}

/// The final summary line for a successful build.
pub fn format_build_summary(report: &BuildReport) -> String {
    format!(
        "Generated {} ({} entries)",
        report.output.display(),
        report.processed.len()
    )
}

pub fn print_build_summary(report: &BuildReport) {
    println!("{}", format_build_summary(report));
}
