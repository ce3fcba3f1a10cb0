pub mod offline_queue_service;
pub mod reconciliation_service;

pub use offline_queue_service::{OfflineQueueService, QueueManager};
pub use reconciliation_service::{ReconciliationService, ReconciliationSettings, RemoteServices};
