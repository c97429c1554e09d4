//! Contribution calendar fetched from the GitHub GraphQL API.

use super::CalendarSource;
use crate::error::{GapfillError, Result};
use crate::model::{ContributionCalendar, DateInterval};
use chrono::{Days, NaiveDate};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// The API rejects `from`/`to` spans longer than a year.
const MAX_WINDOW_DAYS: u64 = 365;

const USER_AGENT: &str = concat!("gapfill/", env!("CARGO_PKG_VERSION"));

const CALENDAR_QUERY: &str = "query($login: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $login) {
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar {
        weeks {
          contributionDays {
            date
            contributionCount
          }
        }
      }
    }
  }
}";

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: Variables<'a>,
}

#[derive(Serialize)]
struct Variables<'a> {
    login: &'a str,
    from: String,
    to: String,
}

pub struct GithubCalendar {
    client: reqwest::blocking::Client,
    endpoint: String,
    username: String,
    token: String,
}

impl GithubCalendar {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint: DEFAULT_GRAPHQL_URL.to_string(),
            username: username.into(),
            token: token.into(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim().trim_end_matches('/').to_string();
        self
    }

    fn fetch_window(&self, window: &DateInterval) -> Result<Option<ContributionCalendar>> {
        let request = GraphqlRequest {
            query: CALENDAR_QUERY,
            variables: Variables {
                login: &self.username,
                from: format!("{}T00:00:00Z", window.start()),
                to: format!("{}T23:59:59Z", window.end()),
            },
        };

        debug!(start = %window.start(), end = %window.end(), "fetching contribution calendar");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(&request)
            .send()?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(GapfillError::Api(
                "token was rejected (401); update it with `gapfill config credentials`".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GapfillError::Api(format!("request failed ({status}): {}", body.trim())));
        }

        let body: Value = response.json()?;
        parse_calendar_response(&body)
    }
}

impl CalendarSource for GithubCalendar {
    fn fetch(&self, interval: &DateInterval) -> Result<Option<ContributionCalendar>> {
        let mut merged: Option<ContributionCalendar> = None;
        for window in split_windows(interval) {
            if let Some(calendar) = self.fetch_window(&window)? {
                merged
                    .get_or_insert_with(ContributionCalendar::default)
                    .weeks
                    .extend(calendar.weeks);
            }
        }
        Ok(merged)
    }
}

/// Pull the calendar out of a GraphQL response body.
///
/// GraphQL `errors` are fatal. A missing or malformed calendar path is not:
/// it yields `None`, which downstream reads as "no existing contributions".
pub fn parse_calendar_response(body: &Value) -> Result<Option<ContributionCalendar>> {
    if let Some(errors) = body.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            let messages: Vec<&str> = errors
                .iter()
                .filter_map(|e| e.get("message").and_then(Value::as_str))
                .collect();
            return Err(GapfillError::Api(messages.join("; ")));
        }
    }

    let Some(raw) = body.pointer("/data/user/contributionsCollection/contributionCalendar") else {
        warn!("response has no contribution calendar; treating every day as empty");
        return Ok(None);
    };

    match serde_json::from_value::<ContributionCalendar>(raw.clone()) {
        Ok(calendar) => Ok(Some(calendar)),
        Err(e) => {
            warn!(error = %e, "malformed contribution calendar; treating every day as empty");
            Ok(None)
        }
    }
}

/// Split an interval into consecutive windows the API accepts.
pub fn split_windows(interval: &DateInterval) -> Vec<DateInterval> {
    let mut windows = Vec::new();
    let mut start = interval.start();
    loop {
        let end = start
            .checked_add_days(Days::new(MAX_WINDOW_DAYS - 1))
            .map_or(interval.end(), |d| d.min(interval.end()));
        if let Ok(window) = DateInterval::new(start, end) {
            windows.push(window);
        }
        match next_day(end) {
            Some(next) if next <= interval.end() => start = next,
            _ => break,
        }
    }
    windows
}

fn next_day(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(1))
}
