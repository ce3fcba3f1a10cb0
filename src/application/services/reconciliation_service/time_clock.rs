use super::driver::{ReconciliationSettings, RemoteServices, within};
use crate::application::ports::RecordFilter;
use crate::domain::entities::offline::TimeClockQueueItem;
use crate::domain::value_objects::offline::ClockAction;
use crate::shared::error::AppError;
use chrono::SecondsFormat;
use serde_json::{Value, json};

pub const TIME_ENTRIES_TABLE: &str = "time_entries";
pub const TIME_ENTRY_BREAKS_TABLE: &str = "time_entry_breaks";

/// Builds the remote write for a queued clock action.
///
/// Times always come from the queued item (explicit clock-out time, else the moment
/// it was captured) so a late sync never shifts the recorded hours.
pub(super) fn remote_write(item: &TimeClockQueueItem) -> RemoteWrite {
    let at = item
        .effective_time()
        .to_rfc3339_opts(SecondsFormat::Millis, true);
    let entry_id = item.entry_id.as_str();

    match item.action {
        ClockAction::ClockOut => {
            let mut patch = json!({
                "clock_out": at,
                "status": "completed",
            });
            if let Some(hours) = item.total_hours {
                patch["total_hours"] = json!(hours);
            }
            RemoteWrite::Update {
                table: TIME_ENTRIES_TABLE,
                filter: RecordFilter::new().eq("id", entry_id),
                patch,
            }
        }
        ClockAction::StartBreak => RemoteWrite::Insert {
            table: TIME_ENTRY_BREAKS_TABLE,
            record: json!({
                "time_entry_id": entry_id,
                "break_start": at,
            }),
        },
        ClockAction::EndBreak => RemoteWrite::Update {
            table: TIME_ENTRY_BREAKS_TABLE,
            filter: RecordFilter::new()
                .eq("time_entry_id", entry_id)
                .is_null("break_end"),
            patch: json!({ "break_end": at }),
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum RemoteWrite {
    Insert {
        table: &'static str,
        record: Value,
    },
    Update {
        table: &'static str,
        filter: RecordFilter,
        patch: Value,
    },
}

pub(super) async fn reconcile(
    remote: &RemoteServices,
    settings: &ReconciliationSettings,
    item: &TimeClockQueueItem,
) -> Result<(), AppError> {
    let operation = format!("time clock {}", item.action);
    match remote_write(item) {
        RemoteWrite::Insert { table, record } => {
            within(
                settings.remote_timeout,
                &operation,
                remote.records.insert(table, record),
            )
            .await
        }
        RemoteWrite::Update {
            table,
            filter,
            patch,
        } => {
            within(
                settings.remote_timeout,
                &operation,
                remote.records.update(table, filter, patch),
            )
            .await
        }
    }
}
