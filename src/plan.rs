use crate::error::{GapfillError, Result};
use crate::model::{DateInterval, DayPlan};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Reject a per-day maximum below one.
pub fn validate_max_commits(max_commits_per_day: i64) -> Result<u32> {
    if max_commits_per_day <= 0 {
        return Err(GapfillError::InvalidConfiguration(format!(
            "max commits per day must be at least 1, got {max_commits_per_day}"
        )));
    }
    u32::try_from(max_commits_per_day).map_err(|_| {
        GapfillError::InvalidConfiguration(format!(
            "max commits per day is too large: {max_commits_per_day}"
        ))
    })
}

/// One `DayPlan` per day of `interval`, in chronological order.
///
/// Days with any existing contribution are never touched. Empty days get
/// `sample_count(max)` commits, kept within `1..=max`.
pub fn plan<F>(
    existing: &HashMap<NaiveDate, u32>,
    interval: &DateInterval,
    max_commits_per_day: u32,
    mut sample_count: F,
) -> Result<Vec<DayPlan>>
where
    F: FnMut(u32) -> u32,
{
    let max = validate_max_commits(i64::from(max_commits_per_day))?;

    let plans = interval
        .days()
        .map(|date| {
            let existing_count = existing.get(&date).copied().unwrap_or(0);
            let commits_to_add = if existing_count > 0 {
                0
            } else {
                sample_count(max).clamp(1, max)
            };
            DayPlan {
                date,
                existing_count,
                commits_to_add,
            }
        })
        .collect();
    Ok(plans)
}

/// Plan straight from raw bounds, failing before anything else when
/// `end < start`.
pub fn plan_between<F>(
    existing: &HashMap<NaiveDate, u32>,
    start: NaiveDate,
    end: NaiveDate,
    max_commits_per_day: u32,
    sample_count: F,
) -> Result<Vec<DayPlan>>
where
    F: FnMut(u32) -> u32,
{
    let interval = DateInterval::new(start, end)?;
    plan(existing, &interval, max_commits_per_day, sample_count)
}
