//! Plot generation via an external visualization tool.
//!
//! Like script execution, plotting is a collaborator behind a narrow trait:
//! given a usage report and an output directory, produce `usage.png` or
//! don't. The real implementation shells out to `con-duct plot` (the tool
//! name is configurable) with a time bound.
//!
//! Success requires both a zero exit code and the output file actually
//! existing afterwards — tools have been known to exit zero after writing
//! nothing. Failures carry the tool's diagnostic stream so the pipeline can
//! surface it in the per-entry warning; they are never errors.

use crate::exec::run_bounded;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

pub const PLOT_FILENAME: &str = "usage.png";

/// Result of one plot attempt.
#[derive(Debug, Clone)]
pub struct PlotOutcome {
    /// Path to the generated image, when the attempt succeeded.
    pub plot_path: Option<PathBuf>,
    /// Tool diagnostics, populated on failure.
    pub diagnostics: String,
}

impl PlotOutcome {
    fn success(path: PathBuf) -> Self {
        Self {
            plot_path: Some(path),
            diagnostics: String::new(),
        }
    }

    fn failure(diagnostics: impl Into<String>) -> Self {
        Self {
            plot_path: None,
            diagnostics: diagnostics.into(),
        }
    }
}

/// Produces a usage plot from a usage report.
pub trait Plotter {
    fn plot(&self, usage_json: &Path, output_dir: &Path) -> PlotOutcome;
}

/// Real plotter: invokes `<tool> plot <usage.json> -o <output_dir>/usage.png`.
#[derive(Debug, Clone)]
pub struct ConDuctPlotter {
    tool: String,
    timeout: Duration,
}

impl ConDuctPlotter {
    pub fn new(tool: impl Into<String>, timeout: Duration) -> Self {
        Self {
            tool: tool.into(),
            timeout,
        }
    }
}

impl Default for ConDuctPlotter {
    fn default() -> Self {
        Self::new("con-duct", Duration::from_secs(60))
    }
}

impl Plotter for ConDuctPlotter {
    fn plot(&self, usage_json: &Path, output_dir: &Path) -> PlotOutcome {
        if !usage_json.exists() {
            return PlotOutcome::failure(format!(
                "usage report not found: {}",
                usage_json.display()
            ));
        }
        if let Err(err) = fs::create_dir_all(output_dir) {
            return PlotOutcome::failure(format!(
                "cannot create {}: {err}",
                output_dir.display()
            ));
        }

        let plot_path = output_dir.join(PLOT_FILENAME);
        let mut command = Command::new(&self.tool);
        command
            .arg("plot")
            .arg(usage_json)
            .arg("-o")
            .arg(&plot_path);

        let outcome = run_bounded(command, self.timeout);
        // Zero exit alone is not enough; the image must exist.
        if outcome.success && plot_path.exists() {
            PlotOutcome::success(plot_path)
        } else {
            PlotOutcome::failure(outcome.stderr)
        }
    }
}
