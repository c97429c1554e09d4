//! Persisted settings: credentials, the saved fill period and the per-day
//! commit maximum.
//!
//! Each lives in its own small JSON file under `$HOME/.gapfill/` (or the
//! directory given with `--config-dir`). Missing files mean "not set".
//! Unreadable or unparseable files are errors naming the path.

use crate::error::{GapfillError, Result};
use crate::model::DateInterval;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = ".gapfill";
const CREDENTIALS_FILE: &str = "credentials.json";
const PERIOD_FILE: &str = "period.json";
const MAX_COMMITS_FILE: &str = "max-commits.json";

pub const DEFAULT_MAX_COMMITS: u32 = 3;
/// Upper bound accepted when saving the per-day maximum.
pub const MAX_COMMITS_LIMIT: u32 = 7;

pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";
pub const USER_ENV_VAR: &str = "GITHUB_USER";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub token: String,
}

impl Credentials {
    pub fn masked_token(&self) -> String {
        let count = self.token.chars().count();
        if count <= 4 {
            return "****".to_string();
        }
        let tail: String = self.token.chars().skip(count - 4).collect();
        format!("****{tail}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Period {
    pub fn interval(&self) -> Result<DateInterval> {
        DateInterval::new(self.start_date, self.end_date)
    }
}

impl From<DateInterval> for Period {
    fn from(interval: DateInterval) -> Self {
        Self {
            start_date: interval.start(),
            end_date: interval.end(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MaxCommits {
    max_commits: u32,
}

pub trait ConfigStore {
    fn credentials(&self) -> Result<Option<Credentials>>;
    fn save_credentials(&self, credentials: &Credentials) -> Result<()>;
    fn period(&self) -> Result<Option<Period>>;
    fn save_period(&self, period: &Period) -> Result<()>;
    /// Falls back to [`DEFAULT_MAX_COMMITS`] when nothing is saved.
    fn max_commits(&self) -> Result<u32>;
    fn save_max_commits(&self, max_commits: u32) -> Result<()>;
}

/// Reject a per-day maximum outside `1..=MAX_COMMITS_LIMIT`.
pub fn check_max_commits_setting(value: u32) -> Result<u32> {
    if !(1..=MAX_COMMITS_LIMIT).contains(&value) {
        return Err(GapfillError::InvalidConfiguration(format!(
            "max commits per day must be between 1 and {MAX_COMMITS_LIMIT}, got {value}"
        )));
    }
    Ok(value)
}

pub struct FileConfigStore {
    dir: PathBuf,
}

impl FileConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `--config-dir` when given, else `$HOME/.gapfill`.
    pub fn open(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Ok(Self::new(dir)),
            None => {
                let home = dirs::home_dir().ok_or_else(|| {
                    GapfillError::InvalidConfiguration(
                        "cannot determine home directory; pass --config-dir".to_string(),
                    )
                })?;
                Ok(Self::new(home.join(CONFIG_DIR_NAME)))
            }
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let path = self.dir.join(name);
        match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map(Some).map_err(|e| GapfillError::Config {
                path,
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GapfillError::Config {
                path,
                message: e.to_string(),
            }),
        }
    }

    fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        let contents = serde_json::to_string_pretty(value)?;
        std::fs::write(&path, contents).map_err(|e| GapfillError::Config {
            path,
            message: e.to_string(),
        })
    }
}

impl ConfigStore for FileConfigStore {
    fn credentials(&self) -> Result<Option<Credentials>> {
        self.read(CREDENTIALS_FILE)
    }

    fn save_credentials(&self, credentials: &Credentials) -> Result<()> {
        self.write(CREDENTIALS_FILE, credentials)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let path = self.dir.join(CREDENTIALS_FILE);
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600)).map_err(|e| {
                GapfillError::Config {
                    path,
                    message: e.to_string(),
                }
            })?;
        }

        Ok(())
    }

    fn period(&self) -> Result<Option<Period>> {
        self.read(PERIOD_FILE)
    }

    fn save_period(&self, period: &Period) -> Result<()> {
        period.interval()?;
        self.write(PERIOD_FILE, period)
    }

    fn max_commits(&self) -> Result<u32> {
        Ok(self
            .read::<MaxCommits>(MAX_COMMITS_FILE)?
            .map_or(DEFAULT_MAX_COMMITS, |m| m.max_commits))
    }

    fn save_max_commits(&self, max_commits: u32) -> Result<()> {
        check_max_commits_setting(max_commits)?;
        self.write(MAX_COMMITS_FILE, &MaxCommits { max_commits })
    }
}

/// In-process store, for tests and one-off runs.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    credentials: RefCell<Option<Credentials>>,
    period: RefCell<Option<Period>>,
    max_commits: RefCell<Option<u32>>,
}

impl ConfigStore for MemoryConfigStore {
    fn credentials(&self) -> Result<Option<Credentials>> {
        Ok(self.credentials.borrow().clone())
    }

    fn save_credentials(&self, credentials: &Credentials) -> Result<()> {
        *self.credentials.borrow_mut() = Some(credentials.clone());
        Ok(())
    }

    fn period(&self) -> Result<Option<Period>> {
        Ok(*self.period.borrow())
    }

    fn save_period(&self, period: &Period) -> Result<()> {
        period.interval()?;
        *self.period.borrow_mut() = Some(*period);
        Ok(())
    }

    fn max_commits(&self) -> Result<u32> {
        Ok(self.max_commits.borrow().unwrap_or(DEFAULT_MAX_COMMITS))
    }

    fn save_max_commits(&self, max_commits: u32) -> Result<()> {
        check_max_commits_setting(max_commits)?;
        *self.max_commits.borrow_mut() = Some(max_commits);
        Ok(())
    }
}

/// Credentials for one run: flags first, then environment, then the store.
///
/// A flag or environment value only overrides the field it names; the other
/// field still comes from the saved credentials.
pub fn resolve_credentials(
    store: &dyn ConfigStore,
    username: Option<&str>,
    token: Option<&str>,
) -> Result<Credentials> {
    resolve_credentials_with_env(
        store,
        username,
        token,
        std::env::var(USER_ENV_VAR).ok(),
        std::env::var(TOKEN_ENV_VAR).ok(),
    )
}

pub fn resolve_credentials_with_env(
    store: &dyn ConfigStore,
    username: Option<&str>,
    token: Option<&str>,
    env_user: Option<String>,
    env_token: Option<String>,
) -> Result<Credentials> {
    let saved = store.credentials()?;

    let username = non_empty(username.map(str::to_string))
        .or_else(|| non_empty(env_user))
        .or_else(|| saved.as_ref().and_then(|c| non_empty(Some(c.username.clone()))));
    let token = non_empty(token.map(str::to_string))
        .or_else(|| non_empty(env_token))
        .or_else(|| saved.as_ref().and_then(|c| non_empty(Some(c.token.clone()))));

    match (username, token) {
        (Some(username), Some(token)) => Ok(Credentials { username, token }),
        (None, _) => Err(GapfillError::MissingCredentials(format!(
            "no GitHub username; pass --username, set {USER_ENV_VAR}, or run `gapfill config credentials`"
        ))),
        (_, None) => Err(GapfillError::MissingCredentials(format!(
            "no GitHub token; pass --token, set {TOKEN_ENV_VAR}, or run `gapfill config credentials`"
        ))),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
