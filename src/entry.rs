//! Gallery entry model and validation.
//!
//! One entry is one immediate subdirectory of the gallery root, described by
//! a fixed naming convention:
//!
//! ```text
//! entries/
//! └── example-1/
//!     ├── command.sh        # Required: the monitored command
//!     ├── setup.sh          # Optional: environment preparation
//!     ├── plots/            # Plot output (must pre-exist in prerendered mode)
//!     ├── README.md         # Optional, currently not rendered
//!     └── .duct/            # duct sidecar metadata (written by execution)
//! ```
//!
//! Validation depends on the processing [`Mode`]:
//!
//! - [`Mode::Execute`]: `command.sh` must be a regular file. `setup.sh` is
//!   optional, but when present it must also be a regular file.
//! - [`Mode::Prerendered`]: `command.sh` must be a readable regular file and
//!   `plots/` must already contain at least one `.png`.
//!
//! A validation failure is a human-readable reason string, not an error —
//! invalid entries are skipped with a warning, never fatal.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const SETUP_SCRIPT: &str = "setup.sh";
pub const COMMAND_SCRIPT: &str = "command.sh";
pub const PLOTS_DIR: &str = "plots";
pub const README_FILE: &str = "README.md";

/// How entries are validated and processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Run `setup.sh` and `command.sh`, then generate a fresh plot.
    #[default]
    Execute,
    /// Skip execution; document plots already present under `plots/`.
    Prerendered,
}

/// One gallery entry and everything processing learns about it.
///
/// Constructed once during discovery from the naming convention; the
/// `command_text`, `usage_json`, and `plot_path` fields are filled in as
/// processing steps succeed. Entries that fail a step keep whatever was
/// resolved so far but are excluded from the final render list.
#[derive(Debug, Clone)]
pub struct GalleryEntry {
    /// Directory basename, unique within one scan.
    pub name: String,
    /// Entry directory.
    pub path: PathBuf,
    /// `setup.sh`, present only when the file exists.
    pub setup_script: Option<PathBuf>,
    /// `command.sh` — required, but existence is checked by `validate`.
    pub command_script: PathBuf,
    /// `plots/` directory (may not exist yet in execute mode).
    pub plots_dir: PathBuf,
    /// `README.md`, present only when the file exists.
    pub readme_file: Option<PathBuf>,
    /// Trimmed `command.sh` source, for display in the rendered document.
    pub command_text: String,
    /// Resolved usage report, once the `.duct` sidecar has been parsed.
    pub usage_json: Option<PathBuf>,
    /// Generated (or pre-existing) plot image.
    pub plot_path: Option<PathBuf>,
}

impl GalleryEntry {
    /// Build an entry from a directory using the fixed naming convention.
    pub fn from_directory(dir: &Path) -> Self {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let setup = dir.join(SETUP_SCRIPT);
        let readme = dir.join(README_FILE);
        Self {
            name,
            path: dir.to_path_buf(),
            setup_script: setup.exists().then_some(setup),
            command_script: dir.join(COMMAND_SCRIPT),
            plots_dir: dir.join(PLOTS_DIR),
            readme_file: readme.is_file().then_some(readme),
            command_text: String::new(),
            usage_json: None,
            plot_path: None,
        }
    }

    /// Validate the entry for the given mode.
    ///
    /// Returns the rejection reason on failure. Reasons always name the
    /// offending file so scan warnings stay actionable.
    pub fn validate(&self, mode: Mode) -> Result<(), String> {
        if !self.path.is_dir() {
            return Err(format!("{} is not a directory", self.path.display()));
        }
        if !self.command_script.exists() {
            return Err(format!("missing {COMMAND_SCRIPT}"));
        }
        if !self.command_script.is_file() {
            return Err(format!("{COMMAND_SCRIPT} is not a regular file"));
        }

        match mode {
            Mode::Execute => {
                if let Some(setup) = &self.setup_script
                    && !setup.is_file()
                {
                    return Err(format!("{SETUP_SCRIPT} is not a regular file"));
                }
            }
            Mode::Prerendered => {
                if fs::File::open(&self.command_script).is_err() {
                    return Err(format!("{COMMAND_SCRIPT} is not readable"));
                }
                if self.existing_plots().is_empty() {
                    return Err(format!("{PLOTS_DIR}/ missing or contains no .png images"));
                }
            }
        }
        Ok(())
    }

    /// All `.png` files already in `plots/`, sorted by name.
    ///
    /// Empty when `plots/` does not exist. The first element is what
    /// prerendered mode documents.
    pub fn existing_plots(&self) -> Vec<PathBuf> {
        let Ok(dir) = fs::read_dir(&self.plots_dir) else {
            return Vec::new();
        };
        let mut plots: Vec<PathBuf> = dir
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .map(|e| e.eq_ignore_ascii_case("png"))
                        .unwrap_or(false)
            })
            .collect();
        plots.sort();
        plots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry_dir(tmp: &TempDir, name: &str) -> PathBuf {
        let dir = tmp.path().join(name);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn from_directory_follows_naming_convention() {
        let tmp = TempDir::new().unwrap();
        let dir = entry_dir(&tmp, "example-1");
        fs::write(dir.join("command.sh"), "echo hi\n").unwrap();
        fs::write(dir.join("setup.sh"), "true\n").unwrap();
        fs::write(dir.join("README.md"), "# example\n").unwrap();

        let entry = GalleryEntry::from_directory(&dir);
        assert_eq!(entry.name, "example-1");
        assert_eq!(entry.command_script, dir.join("command.sh"));
        assert_eq!(entry.setup_script.as_deref(), Some(dir.join("setup.sh").as_path()));
        assert_eq!(entry.plots_dir, dir.join("plots"));
        assert!(entry.readme_file.is_some());
        assert!(entry.command_text.is_empty());
        assert!(entry.usage_json.is_none());
        assert!(entry.plot_path.is_none());
    }

    #[test]
    fn setup_and_readme_absent_when_files_missing() {
        let tmp = TempDir::new().unwrap();
        let dir = entry_dir(&tmp, "bare");
        fs::write(dir.join("command.sh"), "echo hi\n").unwrap();

        let entry = GalleryEntry::from_directory(&dir);
        assert!(entry.setup_script.is_none());
        assert!(entry.readme_file.is_none());
    }

    #[test]
    fn missing_command_script_reason_names_it() {
        let tmp = TempDir::new().unwrap();
        let dir = entry_dir(&tmp, "no-command");

        let entry = GalleryEntry::from_directory(&dir);
        let reason = entry.validate(Mode::Execute).unwrap_err();
        assert!(reason.contains("command.sh"), "reason was: {reason}");
        let reason = entry.validate(Mode::Prerendered).unwrap_err();
        assert!(reason.contains("command.sh"), "reason was: {reason}");
    }

    #[test]
    fn command_script_must_be_regular_file() {
        let tmp = TempDir::new().unwrap();
        let dir = entry_dir(&tmp, "dir-command");
        fs::create_dir_all(dir.join("command.sh")).unwrap();

        let entry = GalleryEntry::from_directory(&dir);
        let reason = entry.validate(Mode::Execute).unwrap_err();
        assert!(reason.contains("command.sh"));
        assert!(reason.contains("not a regular file"));
    }

    #[test]
    fn execute_mode_accepts_entry_without_setup() {
        let tmp = TempDir::new().unwrap();
        let dir = entry_dir(&tmp, "minimal");
        fs::write(dir.join("command.sh"), "echo hi\n").unwrap();

        let entry = GalleryEntry::from_directory(&dir);
        assert!(entry.validate(Mode::Execute).is_ok());
    }

    #[test]
    fn execute_mode_rejects_setup_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = entry_dir(&tmp, "bad-setup");
        fs::write(dir.join("command.sh"), "echo hi\n").unwrap();
        fs::create_dir_all(dir.join("setup.sh")).unwrap();

        let entry = GalleryEntry::from_directory(&dir);
        let reason = entry.validate(Mode::Execute).unwrap_err();
        assert!(reason.contains("setup.sh"));
    }

    #[test]
    fn prerendered_mode_requires_a_png() {
        let tmp = TempDir::new().unwrap();
        let dir = entry_dir(&tmp, "no-plots");
        fs::write(dir.join("command.sh"), "echo hi\n").unwrap();
        fs::create_dir_all(dir.join("plots")).unwrap();

        let entry = GalleryEntry::from_directory(&dir);
        let reason = entry.validate(Mode::Prerendered).unwrap_err();
        assert!(reason.contains("plots/"));
    }

    #[test]
    fn prerendered_mode_ignores_non_png_files() {
        let tmp = TempDir::new().unwrap();
        let dir = entry_dir(&tmp, "wrong-format");
        fs::write(dir.join("command.sh"), "echo hi\n").unwrap();
        fs::create_dir_all(dir.join("plots")).unwrap();
        fs::write(dir.join("plots/usage.svg"), "not a png").unwrap();

        let entry = GalleryEntry::from_directory(&dir);
        assert!(entry.validate(Mode::Prerendered).is_err());
    }

    #[test]
    fn prerendered_mode_accepts_existing_plot() {
        let tmp = TempDir::new().unwrap();
        let dir = entry_dir(&tmp, "ready");
        fs::write(dir.join("command.sh"), "echo hi\n").unwrap();
        fs::create_dir_all(dir.join("plots")).unwrap();
        fs::write(dir.join("plots/usage.png"), "fake png").unwrap();

        let entry = GalleryEntry::from_directory(&dir);
        assert!(entry.validate(Mode::Prerendered).is_ok());
    }

    #[test]
    fn existing_plots_sorted_by_name() {
        let tmp = TempDir::new().unwrap();
        let dir = entry_dir(&tmp, "multi");
        fs::create_dir_all(dir.join("plots")).unwrap();
        fs::write(dir.join("plots/b-usage.png"), "fake").unwrap();
        fs::write(dir.join("plots/a-usage.png"), "fake").unwrap();
        fs::write(dir.join("plots/notes.txt"), "skip me").unwrap();

        let entry = GalleryEntry::from_directory(&dir);
        let plots = entry.existing_plots();
        assert_eq!(plots.len(), 2);
        assert!(plots[0].ends_with("a-usage.png"));
        assert!(plots[1].ends_with("b-usage.png"));
    }
}
