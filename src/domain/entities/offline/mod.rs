pub mod drain_report;
pub mod note_queue_item;
pub mod photo_queue_item;
pub mod queue_counts;
pub mod queue_item;
pub mod queue_meta;
pub mod time_clock_queue_item;
pub mod voice_note_queue_item;

pub use drain_report::{DrainReport, DrainTrigger, KindDrainReport};
pub use note_queue_item::{NoteDraft, NoteQueueItem};
pub use photo_queue_item::{PhotoDraft, PhotoQueueItem};
pub use queue_counts::QueueCounts;
pub use queue_item::{QueueDraft, QueueItem, QueueItemSummary};
pub use queue_meta::QueueItemMeta;
pub use time_clock_queue_item::{TimeClockDraft, TimeClockQueueItem};
pub use voice_note_queue_item::{DEFAULT_AUDIO_MIME, VoiceNoteDraft, VoiceNoteQueueItem};
