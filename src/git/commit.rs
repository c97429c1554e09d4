use super::exec::GitExecutor;
use crate::model::{CommitOutcome, FailureReason, SyntheticCommit};
use tracing::{debug, warn};

const NOTHING_TO_COMMIT: &str = "nothing to commit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitMode {
    /// `--allow-empty`: leaves a dated trace without touching content.
    Empty,
    /// Commits whatever is staged; the caller checks something is.
    Staged,
}

/// Creates one dated commit per call and turns every failure into data.
pub struct CommitDriver<'a, G: GitExecutor + ?Sized> {
    git: &'a G,
}

impl<'a, G: GitExecutor + ?Sized> CommitDriver<'a, G> {
    pub fn new(git: &'a G) -> Self {
        Self { git }
    }

    pub fn create_commit(&self, commit: &SyntheticCommit, mode: CommitMode) -> CommitOutcome {
        let date = commit.timestamp.to_rfc3339();
        let date_arg = format!("--date={date}");

        let mut args = vec!["commit"];
        if mode == CommitMode::Empty {
            args.push("--allow-empty");
        }
        args.extend(["-m", commit.message.as_str(), date_arg.as_str()]);

        let envs = [("GIT_AUTHOR_DATE", date.as_str()), ("GIT_COMMITTER_DATE", date.as_str())];

        match self.git.execute(&args, &envs) {
            Ok(_) => {
                debug!(%date, "commit created");
                CommitOutcome::Created {
                    timestamp: commit.timestamp,
                }
            }
            Err(failure) if failure.mentions(NOTHING_TO_COMMIT) => {
                warn!(%date, "git reported nothing to commit");
                CommitOutcome::Failed {
                    reason: FailureReason::NothingToCommit,
                }
            }
            Err(failure) => {
                let diagnostic = failure.diagnostic();
                warn!(%date, error = %diagnostic, "git commit failed");
                CommitOutcome::Failed {
                    reason: FailureReason::CommandError(diagnostic),
                }
            }
        }
    }
}
