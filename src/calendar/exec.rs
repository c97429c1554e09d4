use super::{fetch_calendar, reconcile};
use crate::cli::{CalendarArgs, CommonArgs};
use crate::config::FileConfigStore;
use crate::fill::resolve_interval;
use crate::git::GitRepo;
use crate::output::{calendar_days, output_calendar, output_calendar_json};
use crate::util::today;
use anyhow::Context;

pub fn exec(common: &CommonArgs, args: CalendarArgs) -> anyhow::Result<()> {
    let store = FileConfigStore::open(common.config_dir.as_deref()).context("Failed to open settings")?;
    let repo = GitRepo::open(common.repo.as_ref()).context("Failed to open git repository")?;

    let interval = resolve_interval(
        &store,
        args.range.since.as_deref(),
        args.range.until.as_deref(),
        today(),
    )?;

    let calendar = fetch_calendar(
        args.source.source,
        &repo,
        &store,
        args.source.username.as_deref(),
        args.source.token.as_deref(),
        &interval,
    )
    .context("Failed to fetch contribution calendar")?;

    let counts = reconcile(calendar.as_ref());
    let days = calendar_days(&counts, &interval);

    if args.json {
        output_calendar_json(&days, &interval)?;
    } else {
        output_calendar(&days, &interval);
    }
    Ok(())
}
