//! Task model and calendar link state.
//!
//! A task's connection to its external calendar event is modeled as an
//! explicit tagged state instead of a nullable id field:
//!
//!   Unlinked ────(create)────> Linked(event_id)
//!   Linked ──(update, due set)──> Linked(event_id)
//!   Linked ──(update, due cleared)──> Unlinked
//!   Linked ──(remote 404 on update)──> Unlinked  (drift healed)
//!   Linked ──(delete)──> Unlinked
//!
//! Both states are valid steady states; a task may cycle between them as its
//! due date is set and cleared.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task workflow status.
///
/// Only `Todo` tasks are considered for calendar sync and due-date
/// notifications.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Todo
    }
}

impl TaskStatus {
    /// Stable string form used in storage and CLI filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }

    /// Parse the storage/CLI string form.
    pub fn parse(s: &str) -> Option<TaskStatus> {
        match s {
            "todo" => Some(TaskStatus::Todo),
            "in_progress" => Some(TaskStatus::InProgress),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }
}

/// Link between a task and its external calendar event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum CalendarLink {
    /// No external event exists (or the last one was removed).
    Unlinked,
    /// An event with this id was created by us. The event may since have
    /// been deleted out-of-band; the link is repaired on the next update.
    Linked(String),
}

impl Default for CalendarLink {
    fn default() -> Self {
        CalendarLink::Unlinked
    }
}

impl CalendarLink {
    pub fn is_linked(&self) -> bool {
        matches!(self, CalendarLink::Linked(_))
    }

    /// The linked event id, if any.
    pub fn event_id(&self) -> Option<&str> {
        match self {
            CalendarLink::Linked(id) => Some(id),
            CalendarLink::Unlinked => None,
        }
    }
}

impl From<Option<String>> for CalendarLink {
    fn from(id: Option<String>) -> Self {
        match id {
            Some(id) => CalendarLink::Linked(id),
            None => CalendarLink::Unlinked,
        }
    }
}

impl From<CalendarLink> for Option<String> {
    fn from(link: CalendarLink) -> Self {
        match link {
            CalendarLink::Linked(id) => Some(id),
            CalendarLink::Unlinked => None,
        }
    }
}

/// A task with an optional date-only due date.
///
/// Due dates deliberately carry no time component; notification logic
/// operates at calendar-day granularity only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: String,
    /// Task title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Workflow status
    pub status: TaskStatus,
    /// Calendar date the task is due (no time-of-day)
    pub due_date: Option<NaiveDate>,
    /// Optional project the task belongs to
    pub project_id: Option<String>,
    /// User the task is assigned to
    pub assigned_to: String,
    /// User who created the task
    pub created_by: String,
    /// Link to the external calendar event
    #[serde(default)]
    pub calendar_link: CalendarLink,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new `Todo` task owned by `user`.
    pub fn new(title: impl Into<String>, user: impl Into<String>) -> Self {
        let now = Utc::now();
        let user = user.into();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: None,
            status: TaskStatus::Todo,
            due_date: None,
            project_id: None,
            assigned_to: user.clone(),
            created_by: user,
            calendar_link: CalendarLink::Unlinked,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the task qualifies for calendar sync: `todo` status with a
    /// due date present.
    pub fn is_sync_eligible(&self) -> bool {
        self.status == TaskStatus::Todo && self.due_date.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn task_serialization_roundtrip() {
        let mut task = Task::new("Write report", "alice");
        task.due_date = NaiveDate::from_ymd_opt(2025, 3, 10);
        task.calendar_link = CalendarLink::Linked("evt-1".to_string());

        let json = serde_json::to_string(&task).unwrap();
        let decoded: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.due_date, task.due_date);
        assert_eq!(decoded.calendar_link, CalendarLink::Linked("evt-1".into()));
    }

    #[test]
    fn calendar_link_serializes_as_nullable_id() {
        let linked = serde_json::to_value(CalendarLink::Linked("abc".into())).unwrap();
        assert_eq!(linked, serde_json::json!("abc"));

        let unlinked = serde_json::to_value(CalendarLink::Unlinked).unwrap();
        assert!(unlinked.is_null());

        let parsed: CalendarLink = serde_json::from_value(serde_json::Value::Null).unwrap();
        assert_eq!(parsed, CalendarLink::Unlinked);
    }

    #[test]
    fn sync_eligibility_requires_todo_and_due_date() {
        let mut task = Task::new("t", "alice");
        assert!(!task.is_sync_eligible());

        task.due_date = NaiveDate::from_ymd_opt(2025, 6, 2);
        assert!(task.is_sync_eligible());

        task.status = TaskStatus::Done;
        assert!(!task.is_sync_eligible());
    }

    #[test]
    fn status_string_roundtrip() {
        for status in [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done] {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::parse("archived"), None);
    }
}
