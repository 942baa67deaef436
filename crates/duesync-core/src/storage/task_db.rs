//! SQLite-based storage for tasks and notifications.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use super::{data_dir, migrations};
use crate::error::DatabaseError;
use crate::notification::{Notification, NotificationType};
use crate::task::{CalendarLink, Task, TaskStatus};

// === Helper functions ===

/// Parse task status from database string.
fn parse_status(status_str: &str) -> TaskStatus {
    TaskStatus::parse(status_str).unwrap_or(TaskStatus::Todo)
}

/// Parse datetime from RFC3339 string with fallback to current time.
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Parse an optional stored calendar date. Dates are validated before they
/// are written, so a parse failure only occurs on hand-edited databases.
fn parse_date_opt(date_str: Option<String>) -> Option<NaiveDate> {
    date_str.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
}

/// Build a Task from a database row.
fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
    let status_str: String = row.get(3)?;
    let due_str: Option<String> = row.get(4)?;
    let event_id: Option<String> = row.get(8)?;
    let created_str: String = row.get(9)?;
    let updated_str: String = row.get(10)?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status: parse_status(&status_str),
        due_date: parse_date_opt(due_str),
        project_id: row.get(5)?,
        assigned_to: row.get(6)?,
        created_by: row.get(7)?,
        calendar_link: CalendarLink::from(event_id),
        created_at: parse_datetime_fallback(&created_str),
        updated_at: parse_datetime_fallback(&updated_str),
    })
}

/// Build a Notification from a database row.
fn row_to_notification(row: &rusqlite::Row) -> Result<Notification, rusqlite::Error> {
    let kind_str: String = row.get(2)?;
    let created_str: String = row.get(8)?;

    Ok(Notification {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: NotificationType::parse(&kind_str).unwrap_or(NotificationType::TaskDueTomorrow),
        related_entity_id: row.get(3)?,
        title: row.get(4)?,
        message: row.get(5)?,
        action_url: row.get(6)?,
        read: row.get(7)?,
        created_at: parse_datetime_fallback(&created_str),
    })
}

const TASK_COLUMNS: &str = "id, title, description, status, due_date, project_id, \
                            assigned_to, created_by, google_event_id, created_at, updated_at";

const NOTIFICATION_COLUMNS: &str = "id, user_id, type, related_entity_id, title, message, \
                                    action_url, read, created_at";

/// Filter for task list queries.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub assigned_to: Option<String>,
    pub created_by: Option<String>,
    pub status: Option<TaskStatus>,
    pub project_id: Option<String>,
}

/// SQLite database for tasks and notifications.
pub struct TaskDb {
    conn: Connection,
}

impl TaskDb {
    /// Open the database at `~/.config/duesync/duesync.db`.
    ///
    /// Creates tables and applies migrations if needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let path = data_dir()?.join("duesync.db");
        let conn = Connection::open(&path).map_err(|source| DatabaseError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory().map_err(|source| DatabaseError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        // Base schema first, then incremental migrations.
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tasks (
                id              TEXT PRIMARY KEY,
                title           TEXT NOT NULL,
                description     TEXT,
                status          TEXT NOT NULL DEFAULT 'todo',
                due_date        TEXT,
                project_id      TEXT,
                assigned_to     TEXT NOT NULL,
                created_by      TEXT NOT NULL,
                google_event_id TEXT,
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS notifications (
                id                TEXT PRIMARY KEY,
                user_id           TEXT NOT NULL,
                type              TEXT NOT NULL,
                related_entity_id TEXT NOT NULL,
                title             TEXT NOT NULL,
                message           TEXT NOT NULL,
                action_url        TEXT,
                read              INTEGER NOT NULL DEFAULT 0,
                created_at        TEXT NOT NULL
            );",
        )?;

        migrations::migrate(&self.conn)
    }

    // === Tasks ===

    pub fn create_task(&self, task: &Task) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO tasks (id, title, description, status, due_date, project_id,
                                assigned_to, created_by, google_event_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                task.id,
                task.title,
                task.description,
                task.status.as_str(),
                task.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
                task.project_id,
                task.assigned_to,
                task.created_by,
                task.calendar_link.event_id(),
                task.created_at.to_rfc3339(),
                task.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_task(&self, id: &str) -> Result<Option<Task>, rusqlite::Error> {
        self.conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                row_to_task,
            )
            .optional()
    }

    pub fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, rusqlite::Error> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<String> = Vec::new();

        if let Some(ref assigned_to) = filter.assigned_to {
            clauses.push("assigned_to = ?");
            values.push(assigned_to.clone());
        }
        if let Some(ref created_by) = filter.created_by {
            clauses.push("created_by = ?");
            values.push(created_by.clone());
        }
        if let Some(status) = filter.status {
            clauses.push("status = ?");
            values.push(status.as_str().to_string());
        }
        if let Some(ref project_id) = filter.project_id {
            clauses.push("project_id = ?");
            values.push(project_id.clone());
        }

        let mut sql = format!("SELECT {TASK_COLUMNS} FROM tasks");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), row_to_task)?;
        rows.collect()
    }

    pub fn update_task(&self, task: &Task) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "UPDATE tasks
             SET title = ?2, description = ?3, status = ?4, due_date = ?5,
                 project_id = ?6, assigned_to = ?7, updated_at = ?8
             WHERE id = ?1",
            params![
                task.id,
                task.title,
                task.description,
                task.status.as_str(),
                task.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
                task.project_id,
                task.assigned_to,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn delete_task(&self, id: &str) -> Result<(), rusqlite::Error> {
        self.conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// Patch only the calendar link. The link is owned by the reconciler;
    /// regular task updates never touch it.
    pub fn set_calendar_link(
        &self,
        task_id: &str,
        link: &CalendarLink,
    ) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "UPDATE tasks SET google_event_id = ?2, updated_at = ?3 WHERE id = ?1",
            params![task_id, link.event_id(), Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Tasks eligible for batch event creation: `todo` status, due date set,
    /// no calendar link yet, assigned to `user_id`.
    pub fn sync_eligible_unlinked(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Task>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE assigned_to = ?1
               AND status = 'todo'
               AND due_date IS NOT NULL
               AND google_event_id IS NULL
             ORDER BY due_date
             LIMIT ?2"
        ))?;
        let rows = stmt.query_map(params![user_id, limit as i64], row_to_task)?;
        rows.collect()
    }

    /// Counts for sync status reporting: (linked, sync-eligible).
    pub fn sync_counts(&self, user_id: &str) -> Result<(usize, usize), rusqlite::Error> {
        let linked: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM tasks
             WHERE assigned_to = ?1 AND google_event_id IS NOT NULL",
            params![user_id],
            |row| row.get(0),
        )?;
        let eligible: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM tasks
             WHERE assigned_to = ?1 AND status = 'todo' AND due_date IS NOT NULL",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok((linked as usize, eligible as usize))
    }

    // === Notifications ===

    /// Insert a notification unless one already exists for the same
    /// (user, type, related entity) triple. Returns whether a row was
    /// actually inserted.
    ///
    /// The dedup unique index makes this safe against concurrent callers:
    /// exactly one insert wins, the rest are ignored.
    pub fn insert_notification_if_absent(
        &self,
        notification: &Notification,
    ) -> Result<bool, rusqlite::Error> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO notifications
                (id, user_id, type, related_entity_id, title, message, action_url, read, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                notification.id,
                notification.user_id,
                notification.kind.as_str(),
                notification.related_entity_id,
                notification.title,
                notification.message,
                notification.action_url,
                notification.read,
                notification.created_at.to_rfc3339(),
            ],
        )?;
        Ok(inserted == 1)
    }

    pub fn list_notifications(
        &self,
        user_id: &str,
        unread_only: bool,
    ) -> Result<Vec<Notification>, rusqlite::Error> {
        let mut sql = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE user_id = ?1"
        );
        if unread_only {
            sql.push_str(" AND read = 0");
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id], row_to_notification)?;
        rows.collect()
    }

    /// Mark notifications read. Returns how many rows changed.
    pub fn mark_notifications_read(&self, ids: &[String]) -> Result<usize, rusqlite::Error> {
        let mut changed = 0;
        for id in ids {
            changed += self.conn.execute(
                "UPDATE notifications SET read = 1 WHERE id = ?1",
                params![id],
            )?;
        }
        Ok(changed)
    }
}
