use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GapfillError, Result};

pub const SCHEMA_VERSION: u32 = 1;

/// A contribution calendar as returned by the hosted platform: weeks of days.
///
/// Every level defaults to empty so a partial payload still deserializes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionCalendar {
    #[serde(default)]
    pub weeks: Vec<ContributionWeek>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionWeek {
    #[serde(default)]
    pub contribution_days: Vec<ContributionDay>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDay {
    pub date: NaiveDate,
    #[serde(default)]
    pub contribution_count: u32,
}

impl ContributionCalendar {
    /// Build a calendar from loose `(date, count)` pairs, grouping them into
    /// Sunday-started weeks the way the hosted calendar does.
    pub fn from_days<I>(days: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, u32)>,
    {
        use chrono::{Datelike, Days};
        use std::collections::BTreeMap;

        let mut by_week: BTreeMap<NaiveDate, Vec<ContributionDay>> = BTreeMap::new();
        for (date, contribution_count) in days {
            let offset = date.weekday().num_days_from_sunday() as u64;
            let week_start = date.checked_sub_days(Days::new(offset)).unwrap_or(date);
            by_week.entry(week_start).or_default().push(ContributionDay {
                date,
                contribution_count,
            });
        }

        let weeks = by_week
            .into_values()
            .map(|mut contribution_days| {
                contribution_days.sort_by_key(|d| d.date);
                ContributionWeek { contribution_days }
            })
            .collect();
        Self { weeks }
    }

    pub fn days(&self) -> impl Iterator<Item = &ContributionDay> {
        self.weeks.iter().flat_map(|w| w.contribution_days.iter())
    }
}

/// Inclusive calendar-day interval. Construction enforces `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateInterval {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateInterval {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(GapfillError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn len_days(&self) -> u64 {
        (self.end - self.start).num_days() as u64 + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub existing_count: u32,
    pub commits_to_add: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticCommit {
    pub timestamp: DateTime<FixedOffset>,
    pub message: String,
}

impl SyntheticCommit {
    pub fn new(timestamp: DateTime<FixedOffset>, message: impl Into<String>) -> Result<Self> {
        let message = message.into();
        validate_message(&message)?;
        Ok(Self { timestamp, message })
    }
}

pub fn validate_message(message: &str) -> Result<()> {
    if message.trim().is_empty() {
        return Err(GapfillError::InvalidConfiguration(
            "commit message cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    NothingToCommit,
    CommandError(String),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::NothingToCommit => write!(f, "nothing to commit"),
            FailureReason::CommandError(diagnostic) => write!(f, "{diagnostic}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Created { timestamp: DateTime<FixedOffset> },
    Failed { reason: FailureReason },
}

impl CommitOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, CommitOutcome::Created { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub commits_created: u32,
    pub commits_failed: u32,
    pub days_planned: u32,
    pub days_skipped: u32,
    pub days_failed: u32,
}

impl RunSummary {
    /// What a plan would do, before any commit is attempted.
    pub fn preview(plans: &[DayPlan]) -> Self {
        let planned = plans.iter().filter(|p| p.commits_to_add > 0).count() as u32;
        Self {
            days_planned: planned,
            days_skipped: plans.len() as u32 - planned,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub dry_run: bool,
    pub plan: Vec<DayPlan>,
    pub summary: RunSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub empty_days: usize,
    pub days: Vec<ContributionDay>,
}
