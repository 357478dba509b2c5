use crate::batch::{run_consumer, BatchRunId, BatchRunRegistry};
use crate::config::Config;
use crate::record::Record;
use crate::store::{LastValueStore, RecordStore};
use chrono::{Local, NaiveDateTime};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// The assembled last-value service.
///
/// Wires the bounded command queue, the batch-run registry, the single
/// consumer task, and the time-indexed store, and delegates the public API
/// to them. Producers and readers call from any number of tasks; all staged
/// state lives inside the one consumer task.
pub struct LastValueService {
    store: Arc<LastValueStore>,
    registry: BatchRunRegistry,
    shutdown: CancellationToken,
    consumer: JoinHandle<()>,
}

impl LastValueService {
    /// Build the pipeline and spawn the consumer task.
    pub fn start(config: Config) -> Self {
        let (tx, rx) = mpsc::channel(config.queue_capacity);
        let store = Arc::new(LastValueStore::new());
        let shutdown = CancellationToken::new();

        let registry = BatchRunRegistry::new(tx, shutdown.clone());

        let consumer_store: Arc<dyn RecordStore> = store.clone();
        let consumer = tokio::spawn(run_consumer(rx, consumer_store, shutdown.clone()));

        info!(queue_capacity = config.queue_capacity, "Service running");

        Self {
            store,
            registry,
            shutdown,
            consumer,
        }
    }

    /// Stop the consumer and wait for it to exit. A dequeue blocked on an
    /// empty queue aborts promptly; commands still queued are not drained.
    pub async fn shutdown(self) {
        info!("Service shutting down");
        self.shutdown.cancel();
        if let Err(e) = self.consumer.await {
            error!(error = %e, "Consumer task join error");
        }
    }

    // ---------- provider API ----------

    /// Open a new batch run. None means the Create command could not be
    /// queued (shutdown in progress).
    pub async fn open(&self) -> Option<BatchRunId> {
        self.registry.open().await
    }

    /// Queue records for an open batch run. True means accepted for
    /// processing, not durably stored.
    pub async fn upload(&self, id: &BatchRunId, records: Vec<Record>) -> bool {
        self.registry.upload(id, records).await
    }

    /// Commit a batch run: every record uploaded to it becomes visible
    /// atomically once the consumer processes the commit.
    pub async fn finish(&self, id: &BatchRunId) -> bool {
        self.registry.finish(id).await
    }

    /// Discard a batch run and everything uploaded to it.
    pub async fn abort(&self, id: &BatchRunId) -> bool {
        self.registry.abort(id).await
    }

    // ---------- requester API ----------

    /// Latest record for `key` as of now.
    pub async fn get_latest(&self, key: &str) -> Option<Record> {
        self.get_latest_as_of(key, Local::now().naive_local()).await
    }

    /// Latest record for `key` with timestamp not exceeding `as_of`.
    pub async fn get_latest_as_of(&self, key: &str, as_of: NaiveDateTime) -> Option<Record> {
        self.store.get_latest(key, as_of).await
    }

    /// Total number of stored records.
    pub async fn size(&self) -> usize {
        self.store.size().await
    }
}
