use super::sync_job::SyncEvent;
use crate::application::services::QueueManager;
use crate::domain::entities::offline::QueueCounts;
use crate::infrastructure::network::ConnectivitySignal;
use crate::shared::error::AppError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};

/// Publishes unfinished item counts for the sync badge.
pub struct QueueStatusPoller {
    queue: Arc<dyn QueueManager>,
    interval: Duration,
    tx: watch::Sender<QueueCounts>,
}

impl QueueStatusPoller {
    pub fn new(queue: Arc<dyn QueueManager>, interval: Duration) -> Self {
        let (tx, _rx) = watch::channel(QueueCounts::default());
        Self {
            queue,
            interval,
            tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<QueueCounts> {
        self.tx.subscribe()
    }

    pub fn latest(&self) -> QueueCounts {
        *self.tx.borrow()
    }

    /// Reads the counts once. On error the previously published value stays in place.
    pub async fn poll_once(&self) -> Result<QueueCounts, AppError> {
        match self.queue.get_counts().await {
            Ok(counts) => {
                self.tx.send_if_modified(|current| {
                    if *current == counts {
                        false
                    } else {
                        *current = counts;
                        true
                    }
                });
                Ok(counts)
            }
            Err(err) => {
                tracing::warn!(
                    target: "offline::status",
                    error = %err,
                    "failed to read queue counts"
                );
                Err(err)
            }
        }
    }

    /// Polls on a fixed interval and immediately after going online or a finished drain.
    pub async fn run(
        self: Arc<Self>,
        connectivity: ConnectivitySignal,
        mut sync_events: Option<broadcast::Receiver<SyncEvent>>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut online_rx = connectivity.subscribe();

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = online_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    if !*online_rx.borrow_and_update() {
                        continue;
                    }
                }
                received = next_event(&mut sync_events) => {
                    if let Err(broadcast::error::RecvError::Closed) = received {
                        sync_events = None;
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            }

            let _ = self.poll_once().await;
        }
    }
}

async fn next_event(
    events: &mut Option<broadcast::Receiver<SyncEvent>>,
) -> Result<SyncEvent, broadcast::error::RecvError> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
