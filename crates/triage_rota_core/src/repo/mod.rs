//! Repository layer abstractions and JSON-file implementations.
//!
//! # Responsibility
//! - Define load/save contracts for history and snapshot state.
//! - Keep file formats and path handling out of the service layer.
//!
//! # Invariants
//! - A missing state file reads as empty state; a malformed one is an error.
//! - Writes create parent directories as needed.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod history_repo;
pub mod snapshot_repo;

mod json_file;

pub use json_file::write_text_file;

use crate::model::cycle::HistoryError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for state persistence.
#[derive(Debug)]
pub enum RepoError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    InvalidData {
        path: PathBuf,
        source: serde_json::Error,
    },
    History(HistoryError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::InvalidData { path, source } => {
                write!(f, "invalid persisted state in `{}`: {source}", path.display())
            }
            Self::History(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidData { source, .. } => Some(source),
            Self::History(err) => Some(err),
        }
    }
}

impl From<HistoryError> for RepoError {
    fn from(value: HistoryError) -> Self {
        Self::History(value)
    }
}
