pub mod ports;
pub mod services;

pub use services::{
    OfflineQueueService, QueueManager, ReconciliationService, ReconciliationSettings,
    RemoteServices,
};
