use crate::batch::command::BatchCommand;
use crate::batch::staging::StagingTable;
use crate::store::RecordStore;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Run the batch-run consumer task.
///
/// The single serializing worker: drains the command queue one command at a
/// time and owns the staging table outright, so nothing here needs a lock.
/// Committed buffers are handed to the store's bulk write; the store's
/// exclusive lock is the only synchronization on the write path.
///
/// Exits when the shutdown token fires or the command channel closes. A
/// blocked dequeue aborts promptly on shutdown rather than draining the
/// remaining queue.
pub async fn run_consumer(
    mut commands: mpsc::Receiver<BatchCommand>,
    store: Arc<dyn RecordStore>,
    shutdown: CancellationToken,
) {
    let mut staging = StagingTable::new();

    info!("Batch run consumer started");

    loop {
        let command = tokio::select! {
            _ = shutdown.cancelled() => break,
            received = commands.recv() => match received {
                Some(command) => command,
                None => {
                    info!("Command channel closed");
                    break;
                }
            },
        };

        info!(command = command.name(), run_id = %command.run_id(), "Consumer received command");

        match command {
            BatchCommand::Create(id) => {
                staging.create(id);
            }
            BatchCommand::Add { id, records } => {
                let count = records.len();
                if !staging.append(&id, records) {
                    warn!(run_id = %id, dropped = count, "Cannot add batch for unknown batch run");
                }
            }
            BatchCommand::Complete(id) => match staging.take(&id) {
                Some(records) => {
                    store.store(records).await;
                }
                None => {
                    warn!(run_id = %id, "Cannot complete unknown batch run");
                }
            },
            BatchCommand::Cancel(id) => {
                if !staging.discard(&id) {
                    warn!(run_id = %id, "Cannot cancel unknown batch run");
                }
            }
        }
    }

    info!(open_runs = staging.open_runs(), "Batch run consumer stopped");
}
