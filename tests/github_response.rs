mod support;

use gapfill::calendar::github::{parse_calendar_response, split_windows};
use gapfill::calendar::reconcile;
use gapfill::error::GapfillError;
use gapfill::model::DateInterval;
use pretty_assertions::assert_eq;
use serde_json::json;
use support::day;

#[test]
fn calendar_is_read_from_the_graphql_payload() {
    let body = json!({
        "data": {
            "user": {
                "contributionsCollection": {
                    "contributionCalendar": {
                        "weeks": [
                            { "contributionDays": [
                                { "date": "2024-01-07", "contributionCount": 0 },
                                { "date": "2024-01-08", "contributionCount": 3 }
                            ]},
                            { "contributionDays": [
                                { "date": "2024-01-14", "contributionCount": 1 }
                            ]}
                        ]
                    }
                }
            }
        }
    });

    let calendar = parse_calendar_response(&body).unwrap().expect("calendar present");
    let counts = reconcile(Some(&calendar));
    assert_eq!(counts.len(), 3);
    assert_eq!(counts[&day(2024, 1, 8)], 3);
    assert_eq!(counts[&day(2024, 1, 7)], 0);
}

#[test]
fn missing_calendar_means_no_existing_contributions() {
    for body in [
        json!({}),
        json!({ "data": null }),
        json!({ "data": { "user": null } }),
        json!({ "data": { "user": { "contributionsCollection": {} } } }),
    ] {
        assert_eq!(parse_calendar_response(&body).unwrap(), None, "{body}");
    }
}

#[test]
fn malformed_calendar_is_treated_as_empty() {
    let body = json!({
        "data": { "user": { "contributionsCollection": {
            "contributionCalendar": { "weeks": [{ "contributionDays": [{ "date": "not a date" }] }] }
        }}}
    });
    assert_eq!(parse_calendar_response(&body).unwrap(), None);
}

#[test]
fn weeks_without_days_still_parse() {
    let body = json!({
        "data": { "user": { "contributionsCollection": {
            "contributionCalendar": { "weeks": [{}] }
        }}}
    });
    let calendar = parse_calendar_response(&body).unwrap().unwrap();
    assert!(reconcile(Some(&calendar)).is_empty());
}

#[test]
fn graphql_errors_are_fatal() {
    let body = json!({
        "data": null,
        "errors": [{ "message": "Could not resolve to a User with the login of 'nobody'." }]
    });
    match parse_calendar_response(&body) {
        Err(GapfillError::Api(message)) => assert!(message.contains("nobody")),
        other => panic!("expected an API error, got {other:?}"),
    }
}

#[test]
fn short_interval_is_one_window() {
    let interval = DateInterval::new(day(2024, 1, 1), day(2024, 1, 31)).unwrap();
    assert_eq!(split_windows(&interval), vec![interval]);
}

#[test]
fn long_interval_splits_into_consecutive_year_windows() {
    let interval = DateInterval::new(day(2022, 1, 1), day(2024, 3, 1)).unwrap();
    let windows = split_windows(&interval);

    assert_eq!(windows.len(), 3);
    assert_eq!(windows[0].start(), interval.start());
    assert_eq!(windows.last().unwrap().end(), interval.end());
    for pair in windows.windows(2) {
        assert_eq!(pair[0].end().succ_opt(), Some(pair[1].start()));
    }
    assert!(windows.iter().all(|w| w.len_days() <= 365));
    let total: u64 = windows.iter().map(|w| w.len_days()).sum();
    assert_eq!(total, interval.len_days());
}
