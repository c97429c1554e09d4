use super::exec::{CommandFailure, GitExecutor};
use crate::error::{GapfillError, Result};

fn run<G: GitExecutor + ?Sized>(git: &G, args: &[&str]) -> Result<String> {
    git.execute(args, &[])
        .map(|out| out.stdout)
        .map_err(|failure: CommandFailure| {
            GapfillError::GitCommand(format!("git {} failed: {}", args.join(" "), failure.diagnostic()))
        })
}

/// Whether anything is staged for the next commit.
pub fn has_staged_changes<G: GitExecutor + ?Sized>(git: &G) -> Result<bool> {
    let names = run(git, &["diff", "--cached", "--name-only"])?;
    Ok(!names.trim().is_empty())
}

/// Paths that are modified or untracked in the working tree.
pub fn changed_files<G: GitExecutor + ?Sized>(git: &G) -> Result<Vec<String>> {
    let status = run(git, &["status", "--porcelain", "-z"])?;
    Ok(parse_porcelain(&status))
}

pub fn stage_file<G: GitExecutor + ?Sized>(git: &G, path: &str) -> Result<()> {
    run(git, &["add", "--", path]).map(|_| ())
}

/// Parse `git status --porcelain -z`: NUL-separated `XY path` entries with
/// unquoted paths. Rename and copy entries are followed by their source path.
pub fn parse_porcelain(status: &str) -> Vec<String> {
    let mut paths = Vec::new();
    let mut entries = status.split('\0');
    while let Some(entry) = entries.next() {
        let (Some(code), Some(path)) = (entry.get(..2), entry.get(3..)) else {
            continue;
        };
        if path.is_empty() {
            continue;
        }
        if code.contains(['R', 'C']) {
            entries.next();
        }
        paths.push(path.to_string());
    }
    paths
}
