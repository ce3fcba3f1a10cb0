pub mod offline;

pub use offline::{
    ClockAction, ProjectId, QueueItemId, QueueKind, QueueStatus, RemoteRecordId, RetryPolicy,
    TranscriptTarget, UserId,
};
