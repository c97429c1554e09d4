pub mod exec;
pub mod github;
pub mod local;
pub mod reconcile;

pub use exec::exec;
pub use github::GithubCalendar;
pub use local::LocalHistoryCalendar;
pub use reconcile::reconcile;

use crate::config::{resolve_credentials, ConfigStore};
use crate::error::Result;
use crate::git::GitRepo;
use crate::model::{ContributionCalendar, DateInterval};

/// Overrides the GraphQL endpoint, e.g. for GitHub Enterprise.
pub const GRAPHQL_URL_ENV_VAR: &str = "GITHUB_GRAPHQL_URL";

/// Where the existing contribution counts come from.
pub trait CalendarSource {
    /// One blocking fetch per run. `Ok(None)` means the source answered but had
    /// no usable calendar; callers treat that as "no existing contributions".
    fn fetch(&self, interval: &DateInterval) -> Result<Option<ContributionCalendar>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SourceKind {
    /// Hosted contribution calendar (needs a username and token)
    Github,
    /// Commit history of the local repository
    Local,
}

/// Fetch existing contributions for `interval` from the chosen source.
pub fn fetch_calendar(
    kind: SourceKind,
    repo: &GitRepo,
    store: &dyn ConfigStore,
    username: Option<&str>,
    token: Option<&str>,
    interval: &DateInterval,
) -> Result<Option<ContributionCalendar>> {
    match kind {
        SourceKind::Github => {
            let credentials = resolve_credentials(store, username, token)?;
            let mut source = GithubCalendar::new(credentials.username, credentials.token);
            if let Ok(url) = std::env::var(GRAPHQL_URL_ENV_VAR) {
                source = source.with_endpoint(&url);
            }
            source.fetch(interval)
        }
        SourceKind::Local => LocalHistoryCalendar::new(repo).fetch(interval),
    }
}
