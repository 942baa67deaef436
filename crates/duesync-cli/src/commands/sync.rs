//! Calendar synchronization commands.
//!
//! A missing Google token is an expected condition: the commands report it
//! and exit successfully rather than failing, so a heartbeat wired to a
//! timer does not alarm on a not-yet-connected account.

use std::time::Duration;

use clap::{Subcommand, ValueEnum};
use duesync_core::credentials;
use duesync_core::storage::{Config, TaskDb};
use duesync_core::sync::{GoogleCalendarClient, SyncAction, SyncOutcome, SyncReconciler};

#[derive(Subcommand)]
pub enum SyncCliAction {
    /// Create calendar events for all eligible tasks (heartbeat)
    Run {
        /// Maximum number of tasks to examine
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Sync a single task's calendar event
    Event {
        /// Operation to perform
        #[arg(value_enum)]
        action: EventAction,
        /// Task ID
        task_id: String,
        /// Explicit external event id (overrides the stored link)
        #[arg(long)]
        event_id: Option<String>,
    },
    /// Show connection state and link counts
    Status,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EventAction {
    Create,
    Update,
    Delete,
}

impl From<EventAction> for SyncAction {
    fn from(action: EventAction) -> Self {
        match action {
            EventAction::Create => SyncAction::Create,
            EventAction::Update => SyncAction::Update,
            EventAction::Delete => SyncAction::Delete,
        }
    }
}

pub fn run(action: SyncCliAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = TaskDb::open()?;

    if let SyncCliAction::Status = action {
        return show_status(&config, &db);
    }

    let Some(token) = credentials::access_token(credentials::GOOGLE)? else {
        println!("Google Calendar is not connected. Run 'duesync-cli auth set-token google <token>' first.");
        return Ok(());
    };

    let client = GoogleCalendarClient::with_base_url(
        config.sync.api_base_url.clone(),
        token,
        config.sync.calendar_id.clone(),
        Duration::from_secs(config.sync.http_timeout_secs),
    )?;
    let reconciler = SyncReconciler::new(&client, &db);

    match action {
        SyncCliAction::Run { limit } => {
            let report = reconciler.run_batch(&config.user, limit.unwrap_or(config.sync.batch_limit))?;
            println!("Synced {}/{} tasks", report.synced, report.total);
        }
        SyncCliAction::Event {
            action,
            task_id,
            event_id,
        } => {
            let task = db
                .get_task(&task_id)?
                .ok_or_else(|| format!("Task not found: {task_id}"))?;
            let outcome = reconciler.sync_event(action.into(), &task, event_id.as_deref())?;
            print_outcome(&outcome);
        }
        SyncCliAction::Status => unreachable!(),
    }

    Ok(())
}

fn show_status(config: &Config, db: &TaskDb) -> Result<(), Box<dyn std::error::Error>> {
    if credentials::is_connected(credentials::GOOGLE) {
        println!("Google Calendar: connected (calendar '{}')", config.sync.calendar_id);
    } else {
        println!("Google Calendar: not connected");
    }

    let (linked, eligible) = db.sync_counts(&config.user)?;
    println!("Linked tasks: {linked}");
    println!("Sync-eligible tasks: {eligible}");
    Ok(())
}

fn print_outcome(outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::Created { event_id } => println!("Created event {event_id}"),
        SyncOutcome::Updated { event_id } => println!("Updated event {event_id}"),
        SyncOutcome::Deleted => println!("Deleted event and cleared link"),
        SyncOutcome::Skipped(reason) => println!("Skipped: {reason}"),
        SyncOutcome::DriftHealed { warning } => println!("Warning: {warning}"),
    }
}
