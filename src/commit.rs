use crate::cli::{CommitArgs, CommonArgs};
use crate::config::FileConfigStore;
use crate::error::GapfillError;
use crate::fill::resolve_interval;
use crate::git::{changed_files, has_staged_changes, stage_file, GitRepo, SystemGit};
use crate::model::CommitOutcome;
use crate::run::Orchestrator;
use crate::sampler::Sampler;
use crate::util::today;
use anyhow::{bail, Context};
use chrono::Local;
use console::style;

pub fn exec(common: &CommonArgs, args: CommitArgs) -> anyhow::Result<()> {
    let repo = GitRepo::open(common.repo.as_ref()).context("Failed to open git repository")?;
    let git = SystemGit::new(repo.path());
    let mut sampler = Sampler::from_seed(args.seed);

    if args.stage_random {
        let files = changed_files(&git).context("Failed to list changed files")?;
        let Some(file) = sampler.pick(&files) else {
            bail!("No changed or untracked files to stage");
        };
        stage_file(&git, file).with_context(|| format!("Failed to stage {file}"))?;
        println!("Staged {}", style(file).cyan());
    }

    if !has_staged_changes(&git).context("Failed to check staged files")? {
        return Err(GapfillError::NothingStaged.into());
    }

    let outcome = match args.at.as_deref() {
        Some(at) => Orchestrator::new(&git, sampler, Local).run_single(at, &args.message)?,
        None => {
            let store = FileConfigStore::open(common.config_dir.as_deref())
                .context("Failed to open settings")?;
            let interval = resolve_interval(
                &store,
                args.range.since.as_deref(),
                args.range.until.as_deref(),
                today(),
            )?;
            Orchestrator::new(&git, sampler, Local).run_single_random(&interval, &args.message)?
        }
    };

    match outcome {
        CommitOutcome::Created { timestamp } => {
            println!("{} commit created at {}", style("✓").green(), timestamp.to_rfc3339());
            Ok(())
        }
        CommitOutcome::Failed { reason } => bail!("Commit was not created: {reason}"),
    }
}
