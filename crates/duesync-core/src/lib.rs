//! # duesync core library
//!
//! Business logic for duesync: a task tracker whose due dates are mirrored,
//! one way, into Google Calendar, with due-date notifications generated by a
//! re-runnable heartbeat. All operations are available through the CLI
//! crate, which is a thin layer over this library.
//!
//! ## Architecture
//!
//! - **Task store**: SQLite-backed tasks and notifications, with the
//!   notification dedup constraint living in the schema
//! - **Event mapper**: pure translation of a due date into a one-day all-day
//!   calendar event (exclusive end date)
//! - **Sync reconciler**: create/update/delete of external events keyed by
//!   each task's [`CalendarLink`], self-healing on remote drift
//! - **Notification engine**: at-most-once "due tomorrow" notifications
//!
//! ## Key components
//!
//! - [`TaskDb`]: task and notification persistence
//! - [`SyncReconciler`]: calendar reconciliation over a [`CalendarApi`]
//! - [`NotificationEngine`]: deduplicated due-date notifications
//! - [`Config`]: application configuration

pub mod credentials;
pub mod error;
pub mod notification;
pub mod storage;
pub mod sync;
pub mod task;

pub use error::{ConfigError, CoreError, DatabaseError};
pub use notification::{Notification, NotificationEngine, NotificationType};
pub use storage::{Config, SyncConfig, TaskDb, TaskFilter};
pub use sync::{
    BatchReport, CalendarApi, GoogleCalendarClient, SyncAction, SyncError, SyncOutcome,
    SyncReconciler,
};
pub use task::{CalendarLink, Task, TaskStatus};
