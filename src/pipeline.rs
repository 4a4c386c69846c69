//! Orchestration: the full build, from gallery root to written document.
//!
//! Drives the other modules in order: validate the output location, scan,
//! process each entry, render, write. Every failure inside an entry
//! (script, sidecar, plot) drops that entry with a warning and moves on;
//! the run only fails when the gallery root is unusable, no entry validates,
//! or no entry survives.
//!
//! Collaborators are injected ([`ScriptRunner`], [`Plotter`]) so the loop is
//! testable without subprocesses. Entries are processed strictly one at a
//! time in scan order; the document is written exactly once, at the end.

use crate::config::GalleryConfig;
use crate::entry::{GalleryEntry, Mode};
use crate::exec::{self, ScriptRunner};
use crate::output;
use crate::plot::Plotter;
use crate::render;
use crate::scan::{self, Gallery, ScanError};
use crate::usage;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("output parent directory does not exist: {0}")]
    MissingOutputParent(PathBuf),
    #[error("output parent path is not a directory: {0}")]
    OutputParentNotADirectory(PathBuf),
    #[error("no valid gallery entries found in {0}")]
    NoValidEntries(PathBuf),
    #[error("no entries were successfully processed")]
    NothingProcessed,
}

/// What a successful build did, for the summary line and for tests.
#[derive(Debug)]
pub struct BuildReport {
    /// Names of entries that made it into the document, in render order.
    pub processed: Vec<String>,
    /// `(name, reason)` pairs rejected at scan time.
    pub rejected: Vec<(String, String)>,
    /// `(name, reason)` pairs dropped during processing.
    pub dropped: Vec<(String, String)>,
    /// Where the document was written.
    pub output: PathBuf,
}

/// Run the full pipeline and write the document to `output_path`.
pub fn build(
    gallery_dir: &Path,
    output_path: &Path,
    mode: Mode,
    config: &GalleryConfig,
    runner: &dyn ScriptRunner,
    plotter: &dyn Plotter,
) -> Result<BuildReport, PipelineError> {
    validate_output_path(output_path)?;

    output::print_line(&format!(
        "Scanning gallery directory: {}",
        gallery_dir.display()
    ));
    let Gallery {
        entries, rejected, ..
    } = scan::scan(gallery_dir, mode)?;

    for (name, reason) in &rejected {
        output::print_warning(name, reason);
    }
    if entries.is_empty() {
        return Err(PipelineError::NoValidEntries(gallery_dir.to_path_buf()));
    }
    output::print_line(&format!("Found {} entries", entries.len()));

    let mut processed = Vec::new();
    let mut dropped = Vec::new();
    for mut entry in entries {
        output::print_line(&format!("Processing entry: {}", entry.name));
        let result = match mode {
            Mode::Execute => process_entry(&mut entry, config, runner, plotter),
            Mode::Prerendered => adopt_prerendered(&mut entry),
        };
        match result {
            Ok(()) => processed.push(entry),
            Err(reason) => {
                output::print_warning(&entry.name, &reason);
                dropped.push((entry.name, reason));
            }
        }
    }

    if processed.is_empty() {
        return Err(PipelineError::NothingProcessed);
    }

    let markdown = render::render_markdown(&processed, output_path);
    fs::write(output_path, markdown)?;

    Ok(BuildReport {
        processed: processed.into_iter().map(|e| e.name).collect(),
        rejected,
        dropped,
        output: output_path.to_path_buf(),
    })
}

/// The output file itself may not exist yet, but its parent must.
fn validate_output_path(output_path: &Path) -> Result<(), PipelineError> {
    let parent = match output_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !parent.exists() {
        return Err(PipelineError::MissingOutputParent(parent));
    }
    if !parent.is_dir() {
        return Err(PipelineError::OutputParentNotADirectory(parent));
    }
    Ok(())
}

/// Execute-mode processing: setup → command → sidecar → plot.
///
/// The error string is the warning reason; the first failing step wins.
fn process_entry(
    entry: &mut GalleryEntry,
    config: &GalleryConfig,
    runner: &dyn ScriptRunner,
    plotter: &dyn Plotter,
) -> Result<(), String> {
    if let Some(setup) = entry.setup_script.clone() {
        output::print_step("Running setup.sh...");
        let outcome = runner.run(&setup, &entry.path, config.setup_timeout());
        if !outcome.success {
            return Err(with_diagnostic("setup.sh failed", &outcome.stderr));
        }
    }

    output::print_step("Running command.sh...");
    let command = entry.command_script.clone();
    let outcome = runner.run(&command, &entry.path, config.command_timeout());
    if !outcome.success {
        return Err(with_diagnostic("command.sh failed", &outcome.stderr));
    }

    entry.command_text = exec::read_command_text(&entry.command_script);

    let report = usage::resolve_usage_report(&entry.path).map_err(|e| e.to_string())?;
    entry.usage_json = Some(report.clone());

    output::print_step("Generating plot...");
    let outcome = plotter.plot(&report, &entry.plots_dir);
    match outcome.plot_path {
        Some(path) => {
            entry.plot_path = Some(path);
            Ok(())
        }
        None => Err(with_diagnostic(
            "plot generation failed",
            &outcome.diagnostics,
        )),
    }
}

/// Prerendered-mode processing: no execution, document what is already
/// there. Validation guaranteed a plot exists, but the directory may have
/// changed underneath us, so check again.
fn adopt_prerendered(entry: &mut GalleryEntry) -> Result<(), String> {
    entry.command_text = exec::read_command_text(&entry.command_script);
    let plot = entry
        .existing_plots()
        .into_iter()
        .next()
        .ok_or_else(|| "plots/ contains no .png images".to_string())?;
    entry.plot_path = Some(plot);
    Ok(())
}

fn with_diagnostic(message: &str, diagnostic: &str) -> String {
    let diagnostic = diagnostic.trim();
    if diagnostic.is_empty() {
        message.to_string()
    } else {
        format!("{message}: {diagnostic}")
    }
}
