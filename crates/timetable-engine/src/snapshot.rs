//! The published dataset snapshot.
//!
//! Queries clone an `Arc` to the current snapshot and compute on it without
//! holding any lock. A refresh decodes the new dataset completely before
//! swapping the pointer, so readers see either the old or the new snapshot,
//! never a mix. A failed reload leaves the current snapshot in place.

use std::path::Path;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use crate::config::EngineConfig;
use crate::dataset::ScheduleDataset;
use crate::error::Result;

/// One immutable, versioned view of the dataset.
#[derive(Debug)]
pub struct Snapshot {
    pub version: u64,
    pub loaded_at: DateTime<Utc>,
    pub dataset: ScheduleDataset,
}

#[derive(Debug)]
pub struct SnapshotStore {
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotStore {
    pub fn new(dataset: ScheduleDataset, loaded_at: DateTime<Utc>) -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot {
                version: 1,
                loaded_at,
                dataset,
            })),
        }
    }

    /// The snapshot in effect right now.
    pub fn current(&self) -> Arc<Snapshot> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Swap in a new dataset and return the new version number.
    pub fn publish(&self, dataset: ScheduleDataset, loaded_at: DateTime<Utc>) -> u64 {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let version = guard.version + 1;
        tracing::info!(
            version,
            classes = dataset.len(),
            rooms = dataset.room_universe().len(),
            "timetable snapshot published"
        );
        *guard = Arc::new(Snapshot {
            version,
            loaded_at,
            dataset,
        });
        version
    }

    /// Decode `path` and publish it. On error the current snapshot is kept.
    pub fn reload(
        &self,
        path: impl AsRef<Path>,
        config: &EngineConfig,
        loaded_at: DateTime<Utc>,
    ) -> Result<u64> {
        let path = path.as_ref();
        match ScheduleDataset::load(path, config) {
            Ok(dataset) => Ok(self.publish(dataset, loaded_at)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "timetable reload failed");
                Err(e)
            }
        }
    }
}
