//! Usage-report resolution.
//!
//! A successful `command.sh` run leaves duct metadata under the entry's
//! `.duct/` directory. The usage report's filename is not fixed — duct
//! prefixes its output files — so it is resolved indirectly: find a
//! `*info.json` sidecar, parse it, and follow its `output_paths.usage`
//! field, which names the report relative to the entry directory.
//!
//! Every way this can go wrong (no sidecar, unreadable, unparseable,
//! missing field, dangling path) is a distinct [`UsageError`] so the
//! per-entry warning says exactly what was missing. None of them are fatal
//! to the run.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SIDECAR_DIR: &str = ".duct";
pub const SIDECAR_SUFFIX: &str = "info.json";

#[derive(Error, Debug)]
pub enum UsageError {
    #[error("no {SIDECAR_SUFFIX} sidecar found in {0}")]
    MissingSidecar(PathBuf),
    #[error("unreadable sidecar {0}: {1}")]
    Unreadable(PathBuf, std::io::Error),
    #[error("failed to parse sidecar {0}: {1}")]
    Parse(PathBuf, serde_json::Error),
    #[error("sidecar {0} does not name a usage report")]
    MissingField(PathBuf),
    #[error("usage report not found at {0}")]
    MissingReport(PathBuf),
}

/// The slice of duct's info sidecar we care about. Everything else in the
/// file is ignored.
#[derive(Debug, Deserialize)]
struct SidecarInfo {
    #[serde(default)]
    output_paths: OutputPaths,
}

#[derive(Debug, Default, Deserialize)]
struct OutputPaths {
    usage: Option<String>,
}

/// Resolve the usage report for one entry directory.
///
/// When several sidecars exist (repeated runs), the first in name order
/// wins — deterministic, and duct's timestamped prefixes make it the oldest.
pub fn resolve_usage_report(entry_dir: &Path) -> Result<PathBuf, UsageError> {
    let sidecar_dir = entry_dir.join(SIDECAR_DIR);
    let mut sidecars: Vec<PathBuf> = fs::read_dir(&sidecar_dir)
        .map_err(|_| UsageError::MissingSidecar(sidecar_dir.clone()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .map(|n| n.to_string_lossy().ends_with(SIDECAR_SUFFIX))
                    .unwrap_or(false)
        })
        .collect();
    sidecars.sort();

    let sidecar = sidecars
        .into_iter()
        .next()
        .ok_or_else(|| UsageError::MissingSidecar(sidecar_dir.clone()))?;

    let content = fs::read_to_string(&sidecar)
        .map_err(|err| UsageError::Unreadable(sidecar.clone(), err))?;
    let info: SidecarInfo =
        serde_json::from_str(&content).map_err(|err| UsageError::Parse(sidecar.clone(), err))?;

    let usage = info
        .output_paths
        .usage
        .ok_or_else(|| UsageError::MissingField(sidecar.clone()))?;

    let report = entry_dir.join(usage);
    if !report.exists() {
        return Err(UsageError::MissingReport(report));
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_sidecar(entry_dir: &Path, name: &str, content: &str) {
        let duct = entry_dir.join(SIDECAR_DIR);
        fs::create_dir_all(&duct).unwrap();
        fs::write(duct.join(name), content).unwrap();
    }

    #[test]
    fn resolves_report_named_by_sidecar() {
        let tmp = TempDir::new().unwrap();
        write_sidecar(
            tmp.path(),
            "2024.01.01T10.00.00-123_info.json",
            r#"{"output_paths": {"usage": ".duct/run_usage.json"}, "schema_version": "0.2.0"}"#,
        );
        fs::write(tmp.path().join(".duct/run_usage.json"), "{}").unwrap();

        let report = resolve_usage_report(tmp.path()).unwrap();
        assert_eq!(report, tmp.path().join(".duct/run_usage.json"));
    }

    #[test]
    fn first_sidecar_in_name_order_wins() {
        let tmp = TempDir::new().unwrap();
        write_sidecar(
            tmp.path(),
            "b_info.json",
            r#"{"output_paths": {"usage": "later.json"}}"#,
        );
        write_sidecar(
            tmp.path(),
            "a_info.json",
            r#"{"output_paths": {"usage": "earlier.json"}}"#,
        );
        fs::write(tmp.path().join("earlier.json"), "{}").unwrap();
        fs::write(tmp.path().join("later.json"), "{}").unwrap();

        let report = resolve_usage_report(tmp.path()).unwrap();
        assert!(report.ends_with("earlier.json"));
    }

    #[test]
    fn missing_duct_dir_is_missing_sidecar() {
        let tmp = TempDir::new().unwrap();
        let result = resolve_usage_report(tmp.path());
        assert!(matches!(result, Err(UsageError::MissingSidecar(_))));
    }

    #[test]
    fn unrelated_files_are_not_sidecars() {
        let tmp = TempDir::new().unwrap();
        write_sidecar(tmp.path(), "run_usage.json", "{}");
        let result = resolve_usage_report(tmp.path());
        assert!(matches!(result, Err(UsageError::MissingSidecar(_))));
    }

    #[test]
    fn malformed_sidecar_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        write_sidecar(tmp.path(), "run_info.json", "not json at all");
        let result = resolve_usage_report(tmp.path());
        assert!(matches!(result, Err(UsageError::Parse(_, _))));
    }

    #[test]
    fn sidecar_without_usage_field_is_error() {
        let tmp = TempDir::new().unwrap();
        write_sidecar(tmp.path(), "run_info.json", r#"{"output_paths": {}}"#);
        let result = resolve_usage_report(tmp.path());
        assert!(matches!(result, Err(UsageError::MissingField(_))));
    }

    #[test]
    fn dangling_usage_path_is_error() {
        let tmp = TempDir::new().unwrap();
        write_sidecar(
            tmp.path(),
            "run_info.json",
            r#"{"output_paths": {"usage": "gone.json"}}"#,
        );
        let result = resolve_usage_report(tmp.path());
        assert!(matches!(result, Err(UsageError::MissingReport(_))));
    }
}
