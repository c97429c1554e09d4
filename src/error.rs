use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GapfillError>;

#[derive(Error, Debug)]
pub enum GapfillError {
    #[error("Invalid interval: end ({end}) is before start ({start})")]
    InvalidInterval { start: NaiveDate, end: NaiveDate },
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Invalid date format: '{0}' (expected YYYY-MM-DD HH:MM:SS)")]
    InvalidDateFormat(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Nothing is staged; use `git add` before creating a dated commit")]
    NothingStaged,
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),
    #[error("Config file error at {path}: {message}")]
    Config { path: PathBuf, message: String },
    #[error("Calendar API error: {0}")]
    Api(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Git command error: {0}")]
    GitCommand(String),
    #[error("Git repository error: {0}")]
    GitRepo(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Head peel error: {0}")]
    HeadPeel(#[from] Box<gix::head::peel::to_commit::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::discover::Error> for GapfillError {
    fn from(err: gix::discover::Error) -> Self {
        GapfillError::GitDiscover(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for GapfillError {
    fn from(err: gix::object::commit::Error) -> Self {
        GapfillError::Commit(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for GapfillError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        GapfillError::RefFind(Box::new(err))
    }
}

impl From<gix::head::peel::to_commit::Error> for GapfillError {
    fn from(err: gix::head::peel::to_commit::Error) -> Self {
        GapfillError::HeadPeel(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for GapfillError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        GapfillError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for GapfillError {
    fn from(err: gix::objs::decode::Error) -> Self {
        GapfillError::ObjectDecode(Box::new(err))
    }
}
