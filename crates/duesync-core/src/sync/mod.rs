//! One-way Google Calendar synchronization for task due dates.
//!
//! Each sync-eligible task (status `todo`, due date set) gets a one-day
//! all-day event in the configured calendar. The task's [`CalendarLink`]
//! records the external event id; the reconciler keeps the two sides
//! consistent without retries, relying on idempotence for convergence.
//!
//! [`CalendarLink`]: crate::task::CalendarLink

pub mod calendar_client;
pub mod event_mapper;
pub mod reconciler;
pub mod types;

pub use calendar_client::{CalendarApi, GoogleCalendarClient, UpdateStatus};
pub use event_mapper::{all_day_range, event_body, parse_due_date, CalendarEventBody};
pub use reconciler::SyncReconciler;
pub use types::{BatchReport, SkipReason, SyncAction, SyncError, SyncOutcome};
