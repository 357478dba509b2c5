pub mod traits;

pub use traits::RecordStore;

use crate::record::Record;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory time-indexed store: per-key ordered map of timestamp to record.
///
/// One shared/exclusive lock guards the whole structure. Floor queries run
/// concurrently under the read lock; bulk writes take the write lock for the
/// duration of the batch, so a query never observes a partial commit. There
/// is exactly one writer task system-wide, so the lock only ever arbitrates
/// readers against that writer.
#[derive(Default)]
pub struct LastValueStore {
    keyed: RwLock<HashMap<String, BTreeMap<NaiveDateTime, Record>>>,
}

impl LastValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for LastValueStore {
    async fn get_latest(&self, key: &str, as_of: NaiveDateTime) -> Option<Record> {
        let keyed = self.keyed.read().await;
        let records = keyed.get(key)?;
        records
            .range(..=as_of)
            .next_back()
            .map(|(_, record)| record.clone())
    }

    async fn store(&self, records: Vec<Record>) {
        let start = Instant::now();
        let count = records.len();

        let mut keyed = self.keyed.write().await;
        for record in records {
            keyed
                .entry(record.key().to_string())
                .or_default()
                .insert(record.timestamp(), record);
        }
        drop(keyed);

        debug!(
            count = count,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Stored batch"
        );
    }

    async fn size(&self) -> usize {
        let keyed = self.keyed.read().await;
        keyed.values().map(BTreeMap::len).sum()
    }
}
