use crate::error::{GapfillError, Result};
use crate::model::DateInterval;
use chrono::{DateTime, FixedOffset, NaiveDate};
use gix::{discover, ObjectId, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or(std::env::current_dir()?);

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Count commits reachable from HEAD per calendar day inside `interval`.
    ///
    /// Days are taken in each commit's own UTC offset, which is how the
    /// hosted calendar buckets pushed history. An unborn HEAD counts nothing.
    pub fn daily_commit_counts(&self, interval: &DateInterval) -> Result<HashMap<NaiveDate, u32>> {
        let mut counts = HashMap::new();

        let mut head = self.repo.head()?;
        if head.is_unborn() {
            return Ok(counts);
        }
        let head_commit = head.peel_to_commit_in_place()?;

        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: VecDeque<ObjectId> = VecDeque::from([head_commit.id]);

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Reading local history...");

        while let Some(commit_id) = stack.pop_back() {
            if !seen.insert(commit_id) {
                continue;
            }

            let commit = self.repo.find_commit(commit_id)?;
            let time = commit.time()?;
            let day = local_day(time.seconds, time.offset)?;

            if interval.contains(day) {
                *counts.entry(day).or_insert(0) += 1;
            }

            for pid in commit.parent_ids() {
                stack.push_back(pid.detach());
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(counts)
    }
}

fn local_day(seconds: i64, offset: i32) -> Result<NaiveDate> {
    let offset = FixedOffset::east_opt(offset)
        .ok_or_else(|| GapfillError::GitRepo(format!("Invalid commit offset: {offset}")))?;
    let utc = DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| GapfillError::InvalidDate(format!("Invalid timestamp: {seconds}")))?;
    Ok(utc.with_timezone(&offset).date_naive())
}
