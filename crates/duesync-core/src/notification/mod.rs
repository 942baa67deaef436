//! Due-date notifications with storage-level deduplication.
//!
//! The heartbeat re-derives eligibility from current task state on every
//! run, so it can be invoked repeatedly (timer or user action) without
//! double-notifying: at most one notification exists per
//! (user, type, related entity) triple, enforced by a unique index.
//!
//! Due dates are calendar dates with no time component, so alerting is
//! day-granularity only ("due tomorrow"); there is no "due in 1 hour".

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::storage::{TaskDb, TaskFilter};
use crate::task::{Task, TaskStatus};

/// Notification category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    TaskDueTomorrow,
}

impl NotificationType {
    /// Stable string form used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::TaskDueTomorrow => "task_due_tomorrow",
        }
    }

    /// Parse the storage string form.
    pub fn parse(s: &str) -> Option<NotificationType> {
        match s {
            "task_due_tomorrow" => Some(NotificationType::TaskDueTomorrow),
            _ => None,
        }
    }
}

/// A user-facing notification about a task.
///
/// Created once per (user, type, task) triple and never updated except for
/// the `read` flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    /// Task this notification concerns.
    pub related_entity_id: String,
    pub title: String,
    pub message: String,
    pub action_url: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Build the "due tomorrow" notification for a task.
    pub fn due_tomorrow(user_id: &str, task: &Task) -> Self {
        let due = task
            .due_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            kind: NotificationType::TaskDueTomorrow,
            related_entity_id: task.id.clone(),
            title: "Task due tomorrow".to_string(),
            message: format!("\"{}\" is due on {}", task.title, due),
            action_url: Some(format!("/tasks/{}", task.id)),
            read: false,
            created_at: Utc::now(),
        }
    }
}

/// Whether `due` falls on the calendar day immediately after `today`.
pub fn due_tomorrow(due: NaiveDate, today: NaiveDate) -> bool {
    today.succ_opt() == Some(due)
}

/// Emits due-date notifications, deduplicated through the store.
pub struct NotificationEngine<'a> {
    db: &'a TaskDb,
}

impl<'a> NotificationEngine<'a> {
    pub fn new(db: &'a TaskDb) -> Self {
        Self { db }
    }

    /// Heartbeat: create a "due tomorrow" notification for each `todo` task
    /// assigned to `user_id` whose due date is the day after `today`.
    ///
    /// Returns the number of notifications actually created, not the number
    /// of tasks examined; already-notified tasks count for nothing.
    pub fn check_due_tomorrow(&self, user_id: &str, today: NaiveDate) -> Result<usize, CoreError> {
        let filter = TaskFilter {
            assigned_to: Some(user_id.to_string()),
            status: Some(TaskStatus::Todo),
            ..Default::default()
        };
        let tasks = self.db.list_tasks(&filter)?;

        let mut created = 0;
        for task in tasks
            .iter()
            .filter(|t| t.due_date.is_some_and(|d| due_tomorrow(d, today)))
        {
            let notification = Notification::due_tomorrow(user_id, task);
            if self.db.insert_notification_if_absent(&notification)? {
                tracing::debug!(task = %task.id, user = %user_id, "created due-tomorrow notification");
                created += 1;
            }
        }
        Ok(created)
    }

    /// Mark notifications read. Returns how many changed.
    pub fn mark_read(&self, ids: &[String]) -> Result<usize, CoreError> {
        Ok(self.db.mark_notifications_read(ids)?)
    }
}
