mod support;

use assert_cmd::prelude::*;
use gapfill::calendar::{reconcile, CalendarSource, GithubCalendar};
use gapfill::error::GapfillError;
use gapfill::model::DateInterval;
use serde_json::json;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::process::Command;
use std::thread::JoinHandle;
use support::day;

/// Local HTTP endpoint that answers each accepted connection with the next
/// scripted `(status, body)` and hands back what it received.
struct MockServer {
    addr: String,
    listener: TcpListener,
}

#[derive(Debug)]
struct CapturedRequest {
    method: String,
    headers: Vec<(String, String)>,
    body: serde_json::Value,
}

impl CapturedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl MockServer {
    fn new() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = format!("http://127.0.0.1:{}/graphql", listener.local_addr().unwrap().port());
        Self { addr, listener }
    }

    fn url(&self) -> String {
        self.addr.clone()
    }

    fn serve(self, responses: Vec<(u16, String)>) -> JoinHandle<Vec<CapturedRequest>> {
        std::thread::spawn(move || {
            responses
                .into_iter()
                .map(|(status, body)| self.respond_once(status, &body))
                .collect()
        })
    }

    fn respond_once(&self, status: u16, body: &str) -> CapturedRequest {
        let (mut stream, _) = self.listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        let method = request_line.split_whitespace().next().unwrap_or("").to_string();

        let mut headers = Vec::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim();
            if line.is_empty() {
                break;
            }
            if let Some((key, value)) = line.split_once(':') {
                if key.trim().eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
                headers.push((key.trim().to_string(), value.trim().to_string()));
            }
        }

        let mut buf = vec![0u8; content_length];
        reader.read_exact(&mut buf).unwrap();

        let response = format!(
            "HTTP/1.1 {status} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();

        CapturedRequest {
            method,
            headers,
            body: serde_json::from_slice(&buf).unwrap_or(serde_json::Value::Null),
        }
    }
}

fn calendar_body(days: &[(&str, u32)]) -> String {
    let days: Vec<_> = days
        .iter()
        .map(|(date, count)| json!({ "date": date, "contributionCount": count }))
        .collect();
    json!({
        "data": { "user": { "contributionsCollection": {
            "contributionCalendar": { "weeks": [{ "contributionDays": days }] }
        }}}
    })
    .to_string()
}

#[test]
fn fetch_posts_query_with_bearer_token() {
    let server = MockServer::new();
    let source = GithubCalendar::new("octocat", "ghp_token").with_endpoint(&server.url());
    let handle = server.serve(vec![(200, calendar_body(&[("2024-01-02", 4)]))]);

    let interval = DateInterval::new(day(2024, 1, 1), day(2024, 1, 31)).unwrap();
    let calendar = source.fetch(&interval).unwrap().expect("calendar");
    let requests = handle.join().unwrap();

    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.method, "POST");
    assert_eq!(req.header("Authorization"), Some("Bearer ghp_token"));
    assert!(req.header("User-Agent").unwrap().starts_with("gapfill/"));
    assert_eq!(req.body["variables"]["login"], "octocat");
    assert_eq!(req.body["variables"]["from"], "2024-01-01T00:00:00Z");
    assert_eq!(req.body["variables"]["to"], "2024-01-31T23:59:59Z");
    assert!(req.body["query"].as_str().unwrap().contains("contributionCalendar"));

    assert_eq!(reconcile(Some(&calendar))[&day(2024, 1, 2)], 4);
}

#[test]
fn long_interval_merges_weeks_from_every_window() {
    let server = MockServer::new();
    let source = GithubCalendar::new("octocat", "t").with_endpoint(&server.url());
    let handle = server.serve(vec![
        (200, calendar_body(&[("2023-06-01", 2)])),
        (200, calendar_body(&[("2024-02-01", 5)])),
    ]);

    let interval = DateInterval::new(day(2023, 1, 1), day(2024, 3, 1)).unwrap();
    let calendar = source.fetch(&interval).unwrap().expect("calendar");
    let requests = handle.join().unwrap();

    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].body["variables"]["to"], "2023-12-31T23:59:59Z");
    assert_eq!(requests[1].body["variables"]["from"], "2024-01-01T00:00:00Z");

    let counts = reconcile(Some(&calendar));
    assert_eq!(counts[&day(2023, 6, 1)], 2);
    assert_eq!(counts[&day(2024, 2, 1)], 5);
}

#[test]
fn rejected_token_is_an_api_error() {
    let server = MockServer::new();
    let source = GithubCalendar::new("octocat", "stale").with_endpoint(&server.url());
    let handle = server.serve(vec![(401, r#"{"message":"Bad credentials"}"#.to_string())]);

    let interval = DateInterval::new(day(2024, 1, 1), day(2024, 1, 2)).unwrap();
    let result = source.fetch(&interval);
    handle.join().unwrap();

    match result {
        Err(GapfillError::Api(message)) => assert!(message.contains("401"), "{message}"),
        other => panic!("expected an API error, got {other:?}"),
    }
}

#[test]
fn server_error_carries_the_response_body() {
    let server = MockServer::new();
    let source = GithubCalendar::new("octocat", "t").with_endpoint(&server.url());
    let handle = server.serve(vec![(502, "upstream unavailable".to_string())]);

    let interval = DateInterval::new(day(2024, 1, 1), day(2024, 1, 2)).unwrap();
    let result = source.fetch(&interval);
    handle.join().unwrap();

    match result {
        Err(GapfillError::Api(message)) => {
            assert!(message.contains("502"), "{message}");
            assert!(message.contains("upstream unavailable"), "{message}");
        }
        other => panic!("expected an API error, got {other:?}"),
    }
}

#[test]
fn failed_second_window_discards_the_whole_fetch() {
    let server = MockServer::new();
    let source = GithubCalendar::new("octocat", "t").with_endpoint(&server.url());
    let handle = server.serve(vec![
        (200, calendar_body(&[("2023-06-01", 2)])),
        (500, "boom".to_string()),
    ]);

    let interval = DateInterval::new(day(2023, 1, 1), day(2024, 3, 1)).unwrap();
    let result = source.fetch(&interval);
    handle.join().unwrap();

    assert!(matches!(result, Err(GapfillError::Api(_))));
}

#[test]
fn fill_stops_before_committing_when_the_calendar_fetch_fails() {
    if Command::new("git").arg("--version").output().is_err() {
        return;
    }
    let repo = tempfile::tempdir().unwrap();
    let config = tempfile::tempdir().unwrap();
    for args in [
        vec!["init"],
        vec!["config", "user.email", "you@example.com"],
        vec!["config", "user.name", "Your Name"],
    ] {
        assert!(Command::new("git").args(&args).current_dir(repo.path()).status().unwrap().success());
    }

    let server = MockServer::new();
    let url = server.url();
    let handle = server.serve(vec![(401, r#"{"message":"Bad credentials"}"#.to_string())]);

    Command::cargo_bin("gapfill")
        .unwrap()
        .current_dir(repo.path())
        .env("GITHUB_GRAPHQL_URL", &url)
        .env("NO_PROXY", "127.0.0.1")
        .arg("--repo")
        .arg(repo.path())
        .arg("--config-dir")
        .arg(config.path())
        .args([
            "fill", "--since", "2024-01-01", "--until", "2024-01-03", "--username", "octocat", "--token", "stale",
        ])
        .assert()
        .failure();
    handle.join().unwrap();

    let head = Command::new("git")
        .args(["rev-parse", "--verify", "HEAD"])
        .current_dir(repo.path())
        .output()
        .unwrap();
    assert!(!head.status.success());
}
