pub mod commit;
pub mod exec;
pub mod repo;
pub mod stage;

pub use commit::{CommitDriver, CommitMode};
pub use exec::{CommandFailure, CommandOutput, GitExecutor, SystemGit};
pub use repo::GitRepo;
pub use stage::{changed_files, has_staged_changes, stage_file};
