pub mod entities;
pub mod value_objects;

pub use entities::offline::{QueueCounts, QueueDraft, QueueItem};
pub use value_objects::{QueueItemId, QueueKind, QueueStatus};
