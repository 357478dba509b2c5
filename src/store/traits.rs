use crate::record::Record;
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Storage seam between the batch consumer and the concrete store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Floor query: the record for `key` with the greatest timestamp not
    /// exceeding `as_of`, if any.
    async fn get_latest(&self, key: &str, as_of: NaiveDateTime) -> Option<Record>;

    /// Bulk upsert of one committed batch run. Within the call, later records
    /// overwrite earlier ones on equal (key, timestamp).
    async fn store(&self, records: Vec<Record>);

    /// Total number of stored records across all keys.
    async fn size(&self) -> usize;
}
