pub mod identity;
pub mod local_queue_store;
pub mod object_storage;
pub mod record_store;
pub mod transcriber;

pub use identity::IdentityProvider;
pub use local_queue_store::LocalQueueStore;
pub use object_storage::ObjectStorage;
pub use record_store::{FilterCondition, RecordFilter, RecordStore};
pub use transcriber::Transcriber;
