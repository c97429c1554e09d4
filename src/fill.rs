use crate::calendar::fetch_calendar;
use crate::cli::{CommonArgs, FillArgs};
use crate::config::{ConfigStore, FileConfigStore, Period};
use crate::error::{GapfillError, Result};
use crate::git::{GitRepo, SystemGit};
use crate::model::{DateInterval, RunSummary};
use crate::output::{output_run_json, print_plan, print_summary, ConsoleReporter};
use crate::plan::validate_max_commits;
use crate::run::{NullReporter, Orchestrator, DEFAULT_MESSAGE};
use crate::sampler::Sampler;
use crate::util::{parse_day, today};
use anyhow::Context;
use chrono::{Local, NaiveDate};
use tracing::info;

pub fn exec(common: &CommonArgs, args: FillArgs) -> anyhow::Result<()> {
    let store = FileConfigStore::open(common.config_dir.as_deref()).context("Failed to open settings")?;
    let repo = GitRepo::open(common.repo.as_ref()).context("Failed to open git repository")?;

    let interval = resolve_interval(
        &store,
        args.range.since.as_deref(),
        args.range.until.as_deref(),
        today(),
    )?;
    let max_per_day = resolve_max_commits(&store, args.max_per_day)?;

    if args.save_period {
        store
            .save_period(&Period::from(interval))
            .context("Failed to save period")?;
    }

    info!(start = %interval.start(), end = %interval.end(), max_per_day, "planning fill");
    let calendar = fetch_calendar(
        args.source.source,
        &repo,
        &store,
        args.source.username.as_deref(),
        args.source.token.as_deref(),
        &interval,
    )
    .context("Failed to fetch contribution calendar")?;

    let git = SystemGit::new(repo.path());
    let message = args.message.unwrap_or_else(|| DEFAULT_MESSAGE.to_string());
    let mut orchestrator =
        Orchestrator::new(&git, Sampler::from_seed(args.seed), Local).with_message(message)?;

    let plans = orchestrator.plan(calendar.as_ref(), &interval, max_per_day)?;
    let repository_path = repo.path().to_string_lossy().to_string();

    if args.dry_run {
        if args.json {
            output_run_json(&repository_path, &interval, true, &plans, RunSummary::preview(&plans))?;
        } else {
            print_plan(&plans);
        }
        return Ok(());
    }

    if args.json {
        let summary = orchestrator.execute_plan(&plans, &mut NullReporter);
        output_run_json(&repository_path, &interval, false, &plans, summary)?;
    } else {
        let summary = orchestrator.execute_plan(&plans, &mut ConsoleReporter::new());
        print_summary(&summary);
    }
    Ok(())
}

/// Resolve the fill period from flags, falling back to the saved period.
///
/// The saved end is only used when the start also comes from the saved
/// period; an explicit `--since` without `--until` runs to `today`. A missing
/// start with no saved period is a configuration error.
pub fn resolve_interval(
    store: &dyn ConfigStore,
    since: Option<&str>,
    until: Option<&str>,
    today: NaiveDate,
) -> Result<DateInterval> {
    let saved = match since {
        Some(_) => None,
        None => store.period()?,
    };

    let start = match since {
        Some(s) => parse_day(s, today)?,
        None => saved.map(|p| p.start_date).ok_or_else(|| {
            GapfillError::InvalidConfiguration(
                "no start date; pass --since or save one with `gapfill config period`".to_string(),
            )
        })?,
    };
    let end = match until {
        Some(u) => parse_day(u, today)?,
        None => saved.map_or(today, |p| p.end_date),
    };

    DateInterval::new(start, end)
}

pub fn resolve_max_commits(store: &dyn ConfigStore, flag: Option<i64>) -> Result<u32> {
    match flag {
        Some(value) => validate_max_commits(value),
        None => validate_max_commits(i64::from(store.max_commits()?)),
    }
}
