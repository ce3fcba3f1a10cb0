mod driver;
mod note;
mod photo;
mod time_clock;
mod voice_note;


pub use driver::{ReconciliationService, ReconciliationSettings, RemoteServices};
pub use photo::storage_path;
pub use time_clock::{TIME_ENTRIES_TABLE, TIME_ENTRY_BREAKS_TABLE};
