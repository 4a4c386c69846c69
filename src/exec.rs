//! Bounded shell-script execution.
//!
//! Script execution is a collaborator, not core logic: the pipeline consumes
//! it through the [`ScriptRunner`] trait so orchestration tests never spawn
//! processes. The contract is deliberately narrow — given a script path and
//! a working directory, run it within a time bound and report pass/fail plus
//! captured output.
//!
//! Nothing in this module returns an error. Spawn failures, timeouts, and
//! non-zero exits all become failure [`ExecOutcome`]s so the caller can keep
//! processing other entries.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::process::{Command,Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Fixed diagnostic for a timed-out subprocess.
pub const TIMEOUT_MESSAGE: &str = "script execution timed out";

/// Result of one subprocess invocation.
#[derive(Debug, Clone)]
pub struct ExecOutcome {
    /// True when the process exited with status zero.
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutcome {
    /// A failure outcome with the diagnostic on stderr.
    pub fn failure(diagnostic: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: diagnostic.into(),
        }
    }
}

/// Runs one entry script within a time bound.
pub trait ScriptRunner {
    fn run(&self, script: &Path, cwd: &Path, timeout: Duration) -> ExecOutcome;
}

/// Real runner: executes the script directly as a subprocess.
#[derive(Debug, Default)]
pub struct ShellRunner;

impl ScriptRunner for ShellRunner {
    fn run(&self, script: &Path, cwd: &Path, timeout: Duration) -> ExecOutcome {
        // Resolve before changing directories; a relative script path would
        // otherwise be looked up against the entry's cwd.
        let script = match fs::canonicalize(script) {
            Ok(p) => p,
            Err(err) => return ExecOutcome::failure(format!("{}: {err}", script.display())),
        };
        let mut command = Command::new(script);
        command.current_dir(cwd);
        run_bounded(command, timeout)
    }
}

/// Spawn `command` with piped output and wait for it at most `timeout`.
///
/// Output pipes are drained on dedicated threads so a chatty child cannot
/// deadlock against a full pipe buffer while we wait on it. On timeout the
/// child is killed and reaped.
pub(crate) fn run_bounded(mut command: Command, timeout: Duration) -> ExecOutcome {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(err) => return ExecOutcome::failure(err.to_string()),
    };

    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let status = match child.wait_timeout(timeout) {
        Ok(Some(status)) => Some(status),
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait();
            None
        }
        Err(err) => {
            let _ = child.kill();
            let _ = child.wait();
            return ExecOutcome::failure(err.to_string());
        }
    };

    let stdout = stdout.map(join_drained).unwrap_or_default();
    let stderr = stderr.map(join_drained).unwrap_or_default();

    match status {
        Some(status) => ExecOutcome {
            success: status.success(),
            stdout,
            stderr,
        },
        None => ExecOutcome {
            success: false,
            stdout,
            stderr: TIMEOUT_MESSAGE.to_string(),
        },
    }
}

fn drain(mut pipe: impl Read + Send + 'static) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf).ok();
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_drained(handle: JoinHandle<String>) -> String {
    handle.join().unwrap_or_default()
}

/// Read the trimmed source of `command.sh` for display in the rendered
/// document. Unreadable scripts yield an empty string, which the renderer
/// treats as "omit the code block".
pub fn read_command_text(command_script: &Path) -> String {
    fs::read_to_string(command_script)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}
