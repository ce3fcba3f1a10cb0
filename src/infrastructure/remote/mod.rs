pub mod backend_client;
pub mod identity;
pub mod object_storage;
pub mod record_store;
pub mod transcriber;

pub use backend_client::BackendClient;
pub use identity::StaticIdentity;
pub use object_storage::HttpObjectStorage;
pub use record_store::HttpRecordStore;
pub use transcriber::HttpTranscriber;
