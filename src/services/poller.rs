use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::services::solar_processor::{Dataset, DashboardSnapshot, SolarDataProcessor, TimeRange};

/// Most recent snapshot produced by the poller, shared with the HTTP layer.
#[derive(Clone, Default)]
pub struct SnapshotStore {
    inner: Arc<RwLock<Option<DashboardSnapshot>>>,
}

impl SnapshotStore {
    pub async fn latest(&self) -> Option<DashboardSnapshot> {
        self.inner.read().await.clone()
    }

    pub async fn replace(&self, snapshot: DashboardSnapshot) {
        *self.inner.write().await = Some(snapshot);
    }
}

pub struct DashboardPoller {
    processor: Arc<SolarDataProcessor>,
    store: SnapshotStore,
    dataset: Dataset,
    range: TimeRange,
    interval: Duration,
}

impl DashboardPoller {
    pub fn new(
        processor: Arc<SolarDataProcessor>,
        store: SnapshotStore,
        dataset: Dataset,
        range: TimeRange,
        interval: Duration,
    ) -> Self {
        Self {
            processor,
            store,
            dataset,
            range,
            interval,
        }
    }

    /// Refreshes immediately, then once per interval until stopped.
    pub fn start(self) -> PollHandle {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let snapshot = tokio::select! {
                            _ = token.cancelled() => break,
                            snapshot = self.processor.fetch_solar_data(self.dataset, self.range) => snapshot,
                        };
                        tracing::debug!(quality = ?snapshot.data_quality, "dashboard snapshot refreshed");
                        self.store.replace(snapshot).await;
                    }
                }
            }
            tracing::info!("dashboard poller stopped");
        });
        PollHandle { cancel, task }
    }
}

/// Owner of a running poller. Dropping the handle without calling
/// [`PollHandle::stop`] leaves the task running.
pub struct PollHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Cancels the task and waits for it to exit. A fetch in flight is
    /// abandoned.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(err) = self.task.await {
            tracing::warn!("dashboard poller task ended abnormally: {err}");
        }
    }
}
