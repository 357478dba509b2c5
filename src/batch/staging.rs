use crate::batch::command::BatchRunId;
use crate::record::Record;
use std::collections::HashMap;

/// Per-batch-run accumulation buffers.
///
/// Owned exclusively by the consumer task; producers never touch it, so no
/// locking is needed. Each open run maps to the records uploaded so far, in
/// arrival order, until the run's single terminal transition (complete or
/// cancel) takes the buffer away.
#[derive(Default)]
pub struct StagingTable {
    runs: HashMap<BatchRunId, Vec<Record>>,
}

impl StagingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an empty staging entry. Ids are never reused, so an existing
    /// entry for the same id is simply replaced.
    pub fn create(&mut self, id: BatchRunId) {
        self.runs.insert(id, Vec::new());
    }

    /// Append records to an open run, preserving arrival order.
    /// Returns false if the run is unknown; the caller decides how to report
    /// the dropped records.
    pub fn append(&mut self, id: &BatchRunId, records: Vec<Record>) -> bool {
        match self.runs.get_mut(id) {
            Some(buffer) => {
                buffer.extend(records);
                true
            }
            None => false,
        }
    }

    /// Remove a run and hand back its full buffer, or None if unknown.
    pub fn take(&mut self, id: &BatchRunId) -> Option<Vec<Record>> {
        self.runs.remove(id)
    }

    /// Remove a run and drop its buffer. Returns false if unknown.
    pub fn discard(&mut self, id: &BatchRunId) -> bool {
        self.runs.remove(id).is_some()
    }

    pub fn open_runs(&self) -> usize {
        self.runs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_record(key: &str, value: f64) -> Record {
        let timestamp = NaiveDate::from_ymd_opt(2021, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Record::new(key, timestamp, value.to_le_bytes().to_vec()).unwrap()
    }

    #[test]
    fn test_append_preserves_arrival_order() {
        let mut staging = StagingTable::new();
        let id = BatchRunId::generate();

        staging.create(id.clone());
        assert!(staging.append(&id, vec![make_record("a", 1.0), make_record("a", 2.0)]));
        assert!(staging.append(&id, vec![make_record("b", 3.0)]));

        let buffer = staging.take(&id).unwrap();
        let values: Vec<f64> = buffer.iter().map(Record::value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
        assert_eq!(staging.open_runs(), 0);
    }

    #[test]
    fn test_append_to_unknown_run_fails() {
        let mut staging = StagingTable::new();
        assert!(!staging.append(&BatchRunId::generate(), vec![make_record("a", 1.0)]));
    }

    #[test]
    fn test_take_is_terminal() {
        let mut staging = StagingTable::new();
        let id = BatchRunId::generate();

        staging.create(id.clone());
        assert!(staging.take(&id).is_some());
        assert!(staging.take(&id).is_none());
        assert!(!staging.discard(&id));
    }

    #[test]
    fn test_discard_drops_buffer() {
        let mut staging = StagingTable::new();
        let id = BatchRunId::generate();

        staging.create(id.clone());
        staging.append(&id, vec![make_record("a", 1.0)]);

        assert!(staging.discard(&id));
        assert!(staging.take(&id).is_none());
    }

    #[test]
    fn test_create_overwrites_existing_entry() {
        let mut staging = StagingTable::new();
        let id = BatchRunId::generate();

        staging.create(id.clone());
        staging.append(&id, vec![make_record("a", 1.0)]);
        staging.create(id.clone());

        assert_eq!(staging.take(&id).unwrap().len(), 0);
    }
}
