use crate::error::{GapfillError, Result};
use chrono::{DateTime, Days, Local, NaiveDate};

/// Parse a day bound: `YYYY-MM-DD`, RFC3339, or a relative duration
/// (`90days`, `2 weeks ago`) counted back from `today`.
pub fn parse_day(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let trimmed = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.date_naive());
    }

    if let Some(days) = parse_relative_days(trimmed) {
        return today
            .checked_sub_days(Days::new(days))
            .ok_or_else(|| GapfillError::InvalidDate(format!("Duration overflow for '{input}'")));
    }

    Err(GapfillError::InvalidDate(format!(
        "'{input}' is not a date (YYYY-MM-DD, RFC3339, or a duration like 90days)"
    )))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_relative_days(input: &str) -> Option<u64> {
    let lowered = input.to_lowercase();
    let amount: String = lowered
        .strip_suffix(" ago")
        .unwrap_or(&lowered)
        .split_whitespace()
        .collect();
    let duration = humantime::parse_duration(&amount).ok()?;
    Some(duration.as_secs() / 86_400)
}

#[cfg(test)]
mod tests {
    use super::parse_day;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_absolute_and_relative_days() {
        let today = d(2024, 3, 31);
        assert_eq!(parse_day("2024-01-05", today).unwrap(), d(2024, 1, 5));
        assert_eq!(parse_day("2024-01-05T23:00:00+02:00", today).unwrap(), d(2024, 1, 5));
        assert_eq!(parse_day("30days", today).unwrap(), d(2024, 3, 1));
        assert_eq!(parse_day("2 weeks ago", today).unwrap(), d(2024, 3, 17));
        assert!(parse_day("last tuesday", today).is_err());
    }
}
