use crate::batch::command::{BatchCommand, BatchRunId};
use crate::record::Record;
use std::collections::HashMap;
use std::sync::RwLock;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// Producer-side bookkeeping for open batch runs.
///
/// The id map is the only structure mutated directly by arbitrary producer
/// tasks; everything past the queue is owned by the single consumer. The map
/// value records whether the run has received at least one upload, which lets
/// `finish` flag empty commits.
pub struct BatchRunRegistry {
    commands: mpsc::Sender<BatchCommand>,
    open_runs: RwLock<HashMap<BatchRunId, bool>>,
    shutdown: CancellationToken,
}

impl BatchRunRegistry {
    pub fn new(commands: mpsc::Sender<BatchCommand>, shutdown: CancellationToken) -> Self {
        Self {
            commands,
            open_runs: RwLock::new(HashMap::new()),
            shutdown,
        }
    }

    /// Enqueue one command, blocking on a full queue. Returns false if the
    /// wait is interrupted by shutdown or the consumer is gone.
    async fn enqueue(&self, command: BatchCommand) -> bool {
        tokio::select! {
            result = self.commands.send(command) => {
                if result.is_err() {
                    error!("Batch command queue closed, consumer is gone");
                    return false;
                }
                true
            }
            _ = self.shutdown.cancelled() => {
                warn!("Enqueue interrupted by shutdown");
                false
            }
        }
    }

    /// Open a new batch run and return its id, or None if the Create command
    /// could not be queued. The registry entry is recorded only after a
    /// successful enqueue, so a failed open never leaks an open id.
    pub async fn open(&self) -> Option<BatchRunId> {
        let id = BatchRunId::generate();

        if !self.enqueue(BatchCommand::Create(id.clone())).await {
            return None;
        }

        self.open_runs
            .write()
            .expect("registry lock poisoned")
            .insert(id.clone(), false);

        Some(id)
    }

    /// Queue records for an open batch run. Returns true once the command is
    /// accepted for processing, not once the records are stored.
    pub async fn upload(&self, id: &BatchRunId, records: Vec<Record>) -> bool {
        if !self.is_open(id) {
            error!(run_id = %id, "No such active batch run id found");
            return false;
        }

        if !self
            .enqueue(BatchCommand::Add {
                id: id.clone(),
                records,
            })
            .await
        {
            return false;
        }

        if let Some(uploaded) = self
            .open_runs
            .write()
            .expect("registry lock poisoned")
            .get_mut(id)
        {
            *uploaded = true;
        }

        true
    }

    /// Commit a batch run. The id is removed from the registry together with
    /// queueing the Complete command, so no further command can be enqueued
    /// for it.
    pub async fn finish(&self, id: &BatchRunId) -> bool {
        let Some(uploaded) = self.uploaded_state(id) else {
            error!(run_id = %id, "No such active batch run id found");
            return false;
        };

        if !self.enqueue(BatchCommand::Complete(id.clone())).await {
            return false;
        }

        if !uploaded {
            warn!(run_id = %id, "Completing batch run without any upload");
        }

        self.open_runs
            .write()
            .expect("registry lock poisoned")
            .remove(id);

        true
    }

    /// Discard a batch run. Symmetric with `finish` but queues Cancel.
    pub async fn abort(&self, id: &BatchRunId) -> bool {
        if !self.is_open(id) {
            error!(run_id = %id, "No such active batch run id found");
            return false;
        }

        if !self.enqueue(BatchCommand::Cancel(id.clone())).await {
            return false;
        }

        self.open_runs
            .write()
            .expect("registry lock poisoned")
            .remove(id);

        true
    }

    fn is_open(&self, id: &BatchRunId) -> bool {
        self.open_runs
            .read()
            .expect("registry lock poisoned")
            .contains_key(id)
    }

    fn uploaded_state(&self, id: &BatchRunId) -> Option<bool> {
        self.open_runs
            .read()
            .expect("registry lock poisoned")
            .get(id)
            .copied()
    }
}
