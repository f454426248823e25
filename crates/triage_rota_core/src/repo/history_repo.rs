//! Assignment history persistence.
//!
//! # Invariants
//! - Repositories store whatever `DutyHistory` they are given; ordering and
//!   append rules live on `DutyHistory::append`.

use super::json_file::{read_json, write_json};
use super::RepoResult;
use crate::model::cycle::DutyHistory;
use log::{debug, info};
use std::path::PathBuf;

/// Repository interface for duty history.
pub trait HistoryRepository {
    fn load(&self) -> RepoResult<DutyHistory>;
    fn save(&self, history: &DutyHistory) -> RepoResult<()>;

    /// Replaces stored history with an empty log.
    fn clear(&self) -> RepoResult<()> {
        self.save(&DutyHistory::new())
    }
}

/// History stored as a flat JSON object of `date -> person`.
pub struct JsonHistoryRepository {
    path: PathBuf,
}

impl JsonHistoryRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HistoryRepository for JsonHistoryRepository {
    fn load(&self) -> RepoResult<DutyHistory> {
        match read_json::<DutyHistory>(&self.path)? {
            Some(history) => {
                debug!(
                    "event=history_load module=repo status=ok cycles={}",
                    history.len()
                );
                Ok(history)
            }
            None => {
                info!(
                    "event=history_load module=repo status=missing path={}",
                    self.path.display()
                );
                Ok(DutyHistory::new())
            }
        }
    }

    fn save(&self, history: &DutyHistory) -> RepoResult<()> {
        write_json(&self.path, history)?;
        debug!(
            "event=history_save module=repo status=ok cycles={}",
            history.len()
        );
        Ok(())
    }
}
