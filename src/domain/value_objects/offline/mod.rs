pub mod clock_action;
pub mod project_id;
pub mod queue_item_id;
pub mod queue_kind;
pub mod queue_status;
pub mod remote_record_id;
pub mod retry_policy;
pub mod transcript_target;
pub mod user_id;

pub use clock_action::ClockAction;
pub use project_id::ProjectId;
pub use queue_item_id::QueueItemId;
pub use queue_kind::QueueKind;
pub use queue_status::QueueStatus;
pub use remote_record_id::RemoteRecordId;
pub use retry_policy::RetryPolicy;
pub use transcript_target::TranscriptTarget;
pub use user_id::UserId;
