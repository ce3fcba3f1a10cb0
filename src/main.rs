use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use fieldsync::domain::entities::offline::{
    DrainTrigger, NoteDraft, PhotoDraft, TimeClockDraft, VoiceNoteDraft,
};
use fieldsync::domain::value_objects::offline::{
    ClockAction, ProjectId, QueueItemId, RemoteRecordId, TranscriptTarget, UserId,
};
use fieldsync::{AppConfig, AppState, HttpConnectivityProbe, QueueKind, QueueManager};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing::info;

#[derive(Parser)]
#[command(name = "fieldsync")]
#[command(about = "Offline capture queue for field crews", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Queue database URL (overrides FIELDSYNC_DATABASE_URL)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable JSON logging
    #[arg(long, global = true, env = "JSON_LOGS")]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Queue an action for later reconciliation
    Enqueue {
        #[command(subcommand)]
        action: EnqueueCommand,
    },
    /// List items a drain would process
    Pending {
        /// Only this queue (photo, note, time_clock, voice_note)
        #[arg(long)]
        kind: Option<QueueKind>,
        /// Include completed, held and in-progress items
        #[arg(long)]
        all: bool,
    },
    /// Print unfinished item counts
    Counts,
    /// Run one drain now
    Sync {
        #[arg(long)]
        kind: Option<QueueKind>,
    },
    /// Delete completed items from a queue
    Clear {
        #[arg(long)]
        kind: QueueKind,
    },
    /// Put a failed item back to pending with a fresh retry budget
    Reset {
        #[arg(long)]
        kind: QueueKind,
        #[arg(long)]
        id: String,
    },
    /// Probe connectivity, drain on reconnect and print badge counts until Ctrl+C
    Watch,
}

#[derive(Subcommand)]
enum EnqueueCommand {
    Photo {
        #[arg(long)]
        project: String,
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        content_type: Option<String>,
        /// Capture time (RFC 3339), defaults to now
        #[arg(long)]
        captured_at: Option<DateTime<Utc>>,
    },
    Note {
        #[arg(long)]
        project: String,
        #[arg(long)]
        content: String,
    },
    Clock {
        #[arg(long)]
        entry: String,
        #[arg(long)]
        user: String,
        /// clock_out, start_break or end_break
        #[arg(long)]
        action: ClockAction,
        /// Clock-out time (RFC 3339)
        #[arg(long)]
        at: Option<DateTime<Utc>>,
        #[arg(long)]
        hours: Option<f64>,
    },
    Voice {
        #[arg(long)]
        photo: String,
        #[arg(long)]
        project: String,
        #[arg(long)]
        file: PathBuf,
        /// notes or recommendation
        #[arg(long)]
        target: TranscriptTarget,
        #[arg(long)]
        mime_type: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    fieldsync::init_logging(cli.json_logs)?;

    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.database_url {
        config.database.url = url;
    }

    let state = AppState::new(config)
        .await
        .context("offline queue is unavailable")?;

    match cli.command {
        Commands::Enqueue { action } => {
            let id = enqueue(&state, action).await?;
            print_json(&serde_json::json!({ "id": id.to_string() }))?;
        }
        Commands::Pending { kind, all } => {
            let kinds = kind.map(|k| vec![k]).unwrap_or_else(|| QueueKind::ALL.to_vec());
            let mut items = Vec::new();
            for kind in kinds {
                let listed = if all {
                    state.queue.list_all(kind).await?
                } else {
                    state.queue.list_pending(kind).await?
                };
                items.extend(listed.iter().map(|item| item.summary()));
            }
            print_json(&items)?;
        }
        Commands::Counts => {
            print_json(&state.queue.get_counts().await?)?;
        }
        Commands::Sync { kind } => match kind {
            Some(kind) => print_json(&state.reconciler.drain(kind).await)?,
            None => print_json(&state.sync_job.run_once(DrainTrigger::Manual).await)?,
        },
        Commands::Clear { kind } => {
            let removed = state.queue.clear_completed(kind).await?;
            print_json(&serde_json::json!({ "kind": kind, "removed": removed }))?;
        }
        Commands::Reset { kind, id } => {
            let id: QueueItemId = id.parse().map_err(|e: String| anyhow!(e))?;
            let item = state.queue.reset_failed(kind, &id).await?;
            print_json(&item.summary())?;
        }
        Commands::Watch => watch_loop(state).await?,
    }

    Ok(())
}

async fn enqueue(state: &AppState, action: EnqueueCommand) -> Result<QueueItemId> {
    let id = match action {
        EnqueueCommand::Photo {
            project,
            file,
            note,
            content_type,
            captured_at,
        } => {
            let bytes = read_file(&file).await?;
            state
                .queue
                .enqueue_photo(PhotoDraft {
                    project_id: ProjectId::new(project).map_err(|e| anyhow!(e))?,
                    file: bytes,
                    file_name: file_name(&file),
                    content_type,
                    note,
                    captured_at: captured_at.unwrap_or_else(Utc::now),
                })
                .await?
        }
        EnqueueCommand::Note { project, content } => {
            state
                .queue
                .enqueue_note(NoteDraft {
                    project_id: ProjectId::new(project).map_err(|e| anyhow!(e))?,
                    content,
                })
                .await?
        }
        EnqueueCommand::Clock {
            entry,
            user,
            action,
            at,
            hours,
        } => {
            state
                .queue
                .enqueue_time_clock(TimeClockDraft {
                    entry_id: RemoteRecordId::new(entry).map_err(|e| anyhow!(e))?,
                    user_id: UserId::new(user).map_err(|e| anyhow!(e))?,
                    action,
                    clock_out_time: at,
                    total_hours: hours,
                })
                .await?
        }
        EnqueueCommand::Voice {
            photo,
            project,
            file,
            target,
            mime_type,
        } => {
            let audio = read_file(&file).await?;
            state
                .queue
                .enqueue_voice_note(VoiceNoteDraft {
                    photo_id: RemoteRecordId::new(photo).map_err(|e| anyhow!(e))?,
                    project_id: ProjectId::new(project).map_err(|e| anyhow!(e))?,
                    audio,
                    mime_type,
                    target_field: target,
                })
                .await?
        }
    };
    Ok(id)
}

async fn watch_loop(state: AppState) -> Result<()> {
    let probe = HttpConnectivityProbe::from_config(
        &state.config.backend,
        state.config.status.probe_interval(),
    )?;
    info!("Probing {} for connectivity", probe.url());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut counts_rx = state.status.subscribe();

    let probe_task = tokio::spawn(probe.run(state.connectivity.clone(), shutdown_rx.clone()));
    let sync_task = tokio::spawn(
        state
            .sync_job
            .clone()
            .run(state.connectivity.clone(), shutdown_rx.clone()),
    );
    let status_task = tokio::spawn(state.status.clone().run(
        state.connectivity.clone(),
        Some(state.sync_events.subscribe()),
        shutdown_rx,
    ));

    loop {
        tokio::select! {
            changed = counts_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let counts = *counts_rx.borrow_and_update();
                print_json(&counts)?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down...");
                break;
            }
        }
    }

    shutdown_tx.send(true).ok();
    let _ = tokio::join!(probe_task, sync_task, status_task);
    Ok(())
}

async fn read_file(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "capture".to_string())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
