use crate::record::Record;
use std::fmt;
use uuid::Uuid;

/// Opaque, globally-unique identifier for one batch run.
///
/// Ids are random, never reused, and carry no ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BatchRunId(Uuid);

impl BatchRunId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for BatchRunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A batch-run command, queued FIFO from producers to the single consumer.
#[derive(Debug, Clone)]
pub enum BatchCommand {
    /// Open an empty staging entry for a new batch run.
    Create(BatchRunId),
    /// Append uploaded records to an open batch run.
    Add {
        id: BatchRunId,
        records: Vec<Record>,
    },
    /// Commit the staged records to the store and close the run.
    Complete(BatchRunId),
    /// Discard the staged records and close the run.
    Cancel(BatchRunId),
}

impl BatchCommand {
    /// Command tag for log messages.
    pub fn name(&self) -> &'static str {
        match self {
            BatchCommand::Create(_) => "CREATE",
            BatchCommand::Add { .. } => "ADD",
            BatchCommand::Complete(_) => "COMPLETE",
            BatchCommand::Cancel(_) => "CANCEL",
        }
    }

    pub fn run_id(&self) -> &BatchRunId {
        match self {
            BatchCommand::Create(id)
            | BatchCommand::Complete(id)
            | BatchCommand::Cancel(id) => id,
            BatchCommand::Add { id, .. } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = BatchRunId::generate();
        let b = BatchRunId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_command_accessors() {
        let id = BatchRunId::generate();
        let cmd = BatchCommand::Complete(id.clone());
        assert_eq!(cmd.name(), "COMPLETE");
        assert_eq!(cmd.run_id(), &id);

        let cmd = BatchCommand::Add {
            id: id.clone(),
            records: Vec::new(),
        };
        assert_eq!(cmd.name(), "ADD");
        assert_eq!(cmd.run_id(), &id);
    }
}
