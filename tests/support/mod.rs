#![allow(dead_code)]

use chrono::NaiveDate;
use gapfill::git::{CommandFailure, CommandOutput, GitExecutor};
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Invocation {
    pub args: Vec<String>,
    pub envs: HashMap<String, String>,
}

impl Invocation {
    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }

    pub fn date_arg(&self) -> Option<&str> {
        self.args.iter().find_map(|a| a.strip_prefix("--date="))
    }
}

/// Records every invocation; fails the calls whose 1-based index is scripted.
#[derive(Default)]
pub struct FakeGit {
    calls: RefCell<Vec<Invocation>>,
    failures: HashMap<usize, CommandFailure>,
}

impl FakeGit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, call: usize, stderr: &str, stdout: &str) -> Self {
        self.failures.insert(
            call,
            CommandFailure {
                exit_code: Some(1),
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Days that received a successful commit, with how many each got.
    pub fn committed_days(&self) -> HashMap<NaiveDate, u32> {
        let mut days = HashMap::new();
        for (i, call) in self.calls.borrow().iter().enumerate() {
            if self.failures.contains_key(&(i + 1)) {
                continue;
            }
            if let Some(date) = call.date_arg() {
                let day = chrono::DateTime::parse_from_rfc3339(date).unwrap().date_naive();
                *days.entry(day).or_insert(0) += 1;
            }
        }
        days
    }
}

impl GitExecutor for FakeGit {
    fn execute(&self, args: &[&str], envs: &[(&str, &str)]) -> Result<CommandOutput, CommandFailure> {
        let mut calls = self.calls.borrow_mut();
        calls.push(Invocation {
            args: args.iter().map(|a| a.to_string()).collect(),
            envs: envs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        });
        match self.failures.get(&calls.len()) {
            Some(failure) => Err(failure.clone()),
            None => Ok(CommandOutput::default()),
        }
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
