//! Sequences reconcile -> plan -> sample -> commit over a whole interval.
//!
//! Commits are created one at a time in chronological order. A failed commit
//! is counted and reported, never propagated; only validation errors stop a
//! run, and they all happen before the first commit.

use crate::calendar::reconcile;
use crate::error::Result;
use crate::git::{CommitDriver, CommitMode, GitExecutor};
use crate::model::{
    validate_message, CommitOutcome, ContributionCalendar, DateInterval, DayPlan, FailureReason,
    RunSummary, SyntheticCommit,
};
use crate::plan::plan;
use crate::sampler::{localize, parse_exact_time, Sampler};
use chrono::{NaiveDate, NaiveDateTime, TimeZone};
use rand::Rng;
use tracing::{info, warn};

pub const DEFAULT_MESSAGE: &str = "chore: retroactive commit";

/// Progress callbacks; every method defaults to doing nothing.
pub trait Reporter {
    fn plan_ready(&mut self, _plans: &[DayPlan]) {}
    fn day_skipped(&mut self, _plan: &DayPlan) {}
    fn day_started(&mut self, _plan: &DayPlan) {}
    fn commit_finished(&mut self, _date: NaiveDate, _index: u32, _total: u32, _outcome: &CommitOutcome) {}
    fn finished(&mut self, _summary: &RunSummary) {}
}

pub struct NullReporter;

impl Reporter for NullReporter {}

pub struct Orchestrator<'a, G: GitExecutor + ?Sized, R, Tz> {
    git: &'a G,
    sampler: Sampler<R>,
    zone: Tz,
    message: String,
}

impl<'a, G, R, Tz> Orchestrator<'a, G, R, Tz>
where
    G: GitExecutor + ?Sized,
    R: Rng,
    Tz: TimeZone,
{
    pub fn new(git: &'a G, sampler: Sampler<R>, zone: Tz) -> Self {
        Self {
            git,
            sampler,
            zone,
            message: DEFAULT_MESSAGE.to_string(),
        }
    }

    /// Message used for batch commits. Blank messages are rejected.
    pub fn with_message(mut self, message: impl Into<String>) -> Result<Self> {
        let message = message.into();
        validate_message(&message)?;
        self.message = message;
        Ok(self)
    }

    /// Reconcile and plan without creating anything.
    pub fn plan(
        &mut self,
        calendar: Option<&ContributionCalendar>,
        interval: &DateInterval,
        max_commits_per_day: u32,
    ) -> Result<Vec<DayPlan>> {
        let existing = reconcile(calendar);
        let sampler = &mut self.sampler;
        plan(&existing, interval, max_commits_per_day, |max| sampler.commit_count(max))
    }

    /// Batch mode: fill every empty day of `interval` with empty commits.
    pub fn run(
        &mut self,
        calendar: Option<&ContributionCalendar>,
        interval: &DateInterval,
        max_commits_per_day: u32,
        reporter: &mut dyn Reporter,
    ) -> Result<RunSummary> {
        let plans = self.plan(calendar, interval, max_commits_per_day)?;
        Ok(self.execute_plan(&plans, reporter))
    }

    pub fn execute_plan(&mut self, plans: &[DayPlan], reporter: &mut dyn Reporter) -> RunSummary {
        reporter.plan_ready(plans);
        let driver = CommitDriver::new(self.git);
        let mut summary = RunSummary::default();

        for day in plans {
            if day.commits_to_add == 0 {
                info!(date = %day.date, existing = day.existing_count, "day already has activity");
                summary.days_skipped += 1;
                reporter.day_skipped(day);
                continue;
            }

            summary.days_planned += 1;
            reporter.day_started(day);
            let mut day_failed = false;

            for index in 1..=day.commits_to_add {
                let civil = self.sampler.time_of_day(day.date);
                let outcome = match self.synthetic_commit(civil, &self.message) {
                    Ok(commit) => driver.create_commit(&commit, CommitMode::Empty),
                    Err(e) => CommitOutcome::Failed {
                        reason: FailureReason::CommandError(e.to_string()),
                    },
                };

                match &outcome {
                    CommitOutcome::Created { timestamp } => {
                        info!(date = %day.date, %timestamp, index, "created commit");
                        summary.commits_created += 1;
                    }
                    CommitOutcome::Failed { reason } => {
                        warn!(date = %day.date, index, %reason, "commit failed");
                        summary.commits_failed += 1;
                        day_failed = true;
                    }
                }
                reporter.commit_finished(day.date, index, day.commits_to_add, &outcome);
            }

            if day_failed {
                summary.days_failed += 1;
            }
        }

        reporter.finished(&summary);
        summary
    }

    /// Single mode: one commit of the staged changes at an exact local time.
    pub fn run_single(&self, exact_time: &str, message: &str) -> Result<CommitOutcome> {
        let civil = parse_exact_time(exact_time)?;
        self.commit_at(civil, message, CommitMode::Staged)
    }

    /// Single mode at a random day of `interval` and a sampled time of day.
    pub fn run_single_random(&mut self, interval: &DateInterval, message: &str) -> Result<CommitOutcome> {
        let day = self.sampler.day_in(interval);
        let civil = self.sampler.time_of_day(day);
        self.commit_at(civil, message, CommitMode::Staged)
    }

    fn commit_at(&self, civil: NaiveDateTime, message: &str, mode: CommitMode) -> Result<CommitOutcome> {
        let commit = self.synthetic_commit(civil, message)?;
        let outcome = CommitDriver::new(self.git).create_commit(&commit, mode);
        if let CommitOutcome::Failed { reason } = &outcome {
            warn!(%civil, %reason, "dated commit failed");
        }
        Ok(outcome)
    }

    fn synthetic_commit(&self, civil: NaiveDateTime, message: &str) -> Result<SyntheticCommit> {
        let timestamp = localize(&self.zone, civil)?;
        SyntheticCommit::new(timestamp, message)
    }
}
