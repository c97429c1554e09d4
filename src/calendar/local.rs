use super::CalendarSource;
use crate::error::Result;
use crate::git::GitRepo;
use crate::model::{ContributionCalendar, DateInterval};

/// Builds the calendar from the local repository's own history, so a run can
/// plan offline and converges against the commits it already created.
pub struct LocalHistoryCalendar<'a> {
    repo: &'a GitRepo,
}

impl<'a> LocalHistoryCalendar<'a> {
    pub fn new(repo: &'a GitRepo) -> Self {
        Self { repo }
    }
}

impl CalendarSource for LocalHistoryCalendar<'_> {
    fn fetch(&self, interval: &DateInterval) -> Result<Option<ContributionCalendar>> {
        let counts = self.repo.daily_commit_counts(interval)?;
        Ok(Some(ContributionCalendar::from_days(counts)))
    }
}
