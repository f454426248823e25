//! Published snapshot persistence.

use super::json_file::{read_json, write_json};
use super::RepoResult;
use crate::model::snapshot::Snapshot;
use log::debug;
use std::path::PathBuf;

/// Repository interface for the published snapshot.
pub trait SnapshotRepository {
    fn load(&self) -> RepoResult<Snapshot>;
    fn save(&self, snapshot: &Snapshot) -> RepoResult<()>;

    fn clear(&self) -> RepoResult<()> {
        self.save(&Snapshot::new())
    }
}

/// Snapshot stored as JSON with `roster` and `schedule` mappings.
pub struct JsonSnapshotRepository {
    path: PathBuf,
}

impl JsonSnapshotRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotRepository for JsonSnapshotRepository {
    fn load(&self) -> RepoResult<Snapshot> {
        Ok(read_json::<Snapshot>(&self.path)?.unwrap_or_default())
    }

    fn save(&self, snapshot: &Snapshot) -> RepoResult<()> {
        write_json(&self.path, snapshot)?;
        debug!(
            "event=snapshot_save module=repo status=ok people={} cycles={}",
            snapshot.roster.len(),
            snapshot.schedule.len()
        );
        Ok(())
    }
}
