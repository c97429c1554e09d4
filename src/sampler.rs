//! Random commit counts and times of day.
//!
//! Every draw goes through an injected `rand::Rng`, so a seeded generator
//! makes a whole run reproducible.

use crate::error::{GapfillError, Result};
use crate::model::DateInterval;
use chrono::{DateTime, Days, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// First hour of the sampling window (inclusive).
pub const FIRST_HOUR: u32 = 8;
/// Last hour of the sampling window (inclusive), so times run to 22:59:59.
pub const LAST_HOUR: u32 = 22;

pub const EXACT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct Sampler<R> {
    rng: R,
}

impl Sampler<StdRng> {
    /// Seeded when `seed` is given, otherwise from OS entropy.
    pub fn from_seed(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(rng)
    }
}

impl<R: Rng> Sampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Uniform in `1..=max`. Callers validate `max >= 1` first.
    pub fn commit_count(&mut self, max: u32) -> u32 {
        self.rng.gen_range(1..=max.max(1))
    }

    /// A civil datetime on `day` between 08:00:00 and 22:59:59.
    pub fn time_of_day(&mut self, day: NaiveDate) -> NaiveDateTime {
        let hour = self.rng.gen_range(FIRST_HOUR..=LAST_HOUR);
        let minute = self.rng.gen_range(0..60);
        let second = self.rng.gen_range(0..60);
        let time = NaiveTime::from_hms_opt(hour, minute, second).unwrap_or(NaiveTime::MIN);
        day.and_time(time)
    }

    /// A uniformly chosen day of `interval`.
    pub fn day_in(&mut self, interval: &DateInterval) -> NaiveDate {
        let offset = self.rng.gen_range(0..interval.len_days());
        interval
            .start()
            .checked_add_days(Days::new(offset))
            .unwrap_or(interval.start())
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }
}

/// Parse a caller-given `YYYY-MM-DD HH:MM:SS` local time.
pub fn parse_exact_time(input: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input.trim(), EXACT_TIME_FORMAT)
        .map_err(|_| GapfillError::InvalidDateFormat(input.to_string()))
}

/// Attach the UTC offset `zone` uses for this civil time.
///
/// Ambiguous times (clocks going back) take the earlier instant. Times that
/// do not exist (clocks going forward) move one hour later.
pub fn localize<Tz: TimeZone>(zone: &Tz, civil: NaiveDateTime) -> Result<DateTime<FixedOffset>> {
    let resolved = match zone.from_local_datetime(&civil) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => zone
            .from_local_datetime(&(civil + TimeDelta::hours(1)))
            .earliest(),
    };

    resolved
        .map(|dt| dt.fixed_offset())
        .ok_or_else(|| GapfillError::InvalidDate(format!("{civil} does not exist in the local timezone")))
}
