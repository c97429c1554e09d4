//! The version-control invocation primitive.
//!
//! `SystemGit` shells out to `git` via `std::process::Command`; tests swap in
//! their own `GitExecutor`.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// A git invocation that did not exit zero, or could not be started at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandFailure {
    pub fn spawn(err: &std::io::Error) -> Self {
        Self {
            exit_code: None,
            stdout: String::new(),
            stderr: format!("failed to execute git: {err}"),
        }
    }

    /// The most useful single line of diagnostics for display.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        let text = if stderr.is_empty() { self.stdout.trim() } else { stderr };
        match (text.is_empty(), self.exit_code) {
            (true, Some(code)) => format!("git exited with status {code}"),
            (true, None) => "git terminated by signal".to_string(),
            (false, _) => text.to_string(),
        }
    }

    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.stderr.to_lowercase().contains(&needle) || self.stdout.to_lowercase().contains(&needle)
    }
}

pub trait GitExecutor {
    fn execute(&self, args: &[&str], envs: &[(&str, &str)]) -> Result<CommandOutput, CommandFailure>;
}

pub struct SystemGit {
    workdir: PathBuf,
}

impl SystemGit {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self { workdir: workdir.into() }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }
}

impl GitExecutor for SystemGit {
    fn execute(&self, args: &[&str], envs: &[(&str, &str)]) -> Result<CommandOutput, CommandFailure> {
        debug!(args = ?args, "running git");
        let output = Command::new("git")
            .args(args)
            .envs(envs.iter().copied())
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| CommandFailure::spawn(&e))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(CommandFailure {
                exit_code: output.status.code(),
                stdout,
                stderr,
            });
        }
        Ok(CommandOutput { stdout, stderr })
    }
}
