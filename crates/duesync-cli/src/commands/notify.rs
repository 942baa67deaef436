//! Due-date notification commands.

use chrono::Local;
use clap::Subcommand;
use duesync_core::notification::NotificationEngine;
use duesync_core::storage::{Config, TaskDb};

#[derive(Subcommand)]
pub enum NotifyAction {
    /// Create "due tomorrow" notifications for eligible tasks (heartbeat)
    Check,
    /// List notifications
    List {
        /// Only unread notifications
        #[arg(long)]
        unread: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark notifications read
    MarkRead {
        /// Notification IDs
        ids: Vec<String>,
    },
}

pub fn run(action: NotifyAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = TaskDb::open()?;
    let config = Config::load()?;
    let engine = NotificationEngine::new(&db);

    match action {
        NotifyAction::Check => {
            // Eligibility is evaluated against the local calendar day.
            let today = Local::now().date_naive();
            let created = engine.check_due_tomorrow(&config.user, today)?;
            println!("Created {created} notifications");
        }
        NotifyAction::List { unread, json } => {
            let notifications = db.list_notifications(&config.user, unread)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&notifications)?);
            } else if notifications.is_empty() {
                println!("No notifications.");
            } else {
                for n in &notifications {
                    let marker = if n.read { " " } else { "*" };
                    println!("{marker} {}  {}  {}", n.id, n.title, n.message);
                }
            }
        }
        NotifyAction::MarkRead { ids } => {
            let changed = engine.mark_read(&ids)?;
            println!("Marked {changed} notifications read");
        }
    }

    Ok(())
}
