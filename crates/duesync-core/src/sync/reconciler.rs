//! Reconciles tasks against their external calendar events.
//!
//! One-way, best-effort synchronization keyed by each task's
//! [`CalendarLink`]. Operations are idempotent: re-running after a transient
//! failure converges, because eligibility is re-derived from current task
//! state on every run.

use crate::storage::TaskDb;
use crate::sync::calendar_client::{CalendarApi, UpdateStatus};
use crate::sync::event_mapper::event_body;
use crate::sync::types::{BatchReport, SkipReason, SyncAction, SyncError, SyncOutcome};
use crate::task::{CalendarLink, Task};

/// Drives create/update/delete of external calendar events for tasks.
pub struct SyncReconciler<'a, C: CalendarApi> {
    calendar: &'a C,
    db: &'a TaskDb,
}

impl<'a, C: CalendarApi> SyncReconciler<'a, C> {
    pub fn new(calendar: &'a C, db: &'a TaskDb) -> Self {
        Self { calendar, db }
    }

    /// Dispatch a single-task sync operation by caller intent.
    pub fn sync_event(
        &self,
        action: SyncAction,
        task: &Task,
        event_id: Option<&str>,
    ) -> Result<SyncOutcome, SyncError> {
        match action {
            SyncAction::Create => self.create(task),
            SyncAction::Update => self.update(task, event_id),
            SyncAction::Delete => self.delete(task, event_id),
        }
    }

    /// Create an external event for the task and record the link.
    ///
    /// A task without a due date is skipped, not failed.
    pub fn create(&self, task: &Task) -> Result<SyncOutcome, SyncError> {
        let Some(due) = task.due_date else {
            return Ok(SyncOutcome::Skipped(SkipReason::NoDueDate));
        };

        let body = event_body(task, due)?;
        let event_id = self.calendar.create_event(&body)?;
        self.db
            .set_calendar_link(&task.id, &CalendarLink::Linked(event_id.clone()))?;
        tracing::debug!(task = %task.id, event = %event_id, "linked task to calendar event");
        Ok(SyncOutcome::Created { event_id })
    }

    /// Push the task's current state onto its linked event (full replace).
    ///
    /// A cleared due date degrades to delete: a task without a due date does
    /// not keep a calendar entry. A remote 404 is treated as link drift and
    /// self-heals by clearing the stale link; the event is not recreated.
    pub fn update(&self, task: &Task, event_id: Option<&str>) -> Result<SyncOutcome, SyncError> {
        let event_id = event_id
            .or_else(|| task.calendar_link.event_id())
            .ok_or(SyncError::NotLinked)?;

        let Some(due) = task.due_date else {
            self.calendar.delete_event(event_id)?;
            self.db.set_calendar_link(&task.id, &CalendarLink::Unlinked)?;
            return Ok(SyncOutcome::Deleted);
        };

        let body = event_body(task, due)?;
        match self.calendar.update_event(event_id, &body)? {
            UpdateStatus::Updated => Ok(SyncOutcome::Updated {
                event_id: event_id.to_string(),
            }),
            UpdateStatus::Missing => {
                self.db.set_calendar_link(&task.id, &CalendarLink::Unlinked)?;
                tracing::warn!(task = %task.id, event = %event_id, "calendar event gone remotely; cleared link");
                Ok(SyncOutcome::DriftHealed {
                    warning: format!("calendar event {event_id} no longer exists; link cleared"),
                })
            }
        }
    }

    /// Remove the task's external event, if any, and clear the link.
    ///
    /// Deleting an already-absent remote event is tolerated silently.
    pub fn delete(&self, task: &Task, event_id: Option<&str>) -> Result<SyncOutcome, SyncError> {
        let Some(event_id) = event_id.or_else(|| task.calendar_link.event_id()) else {
            return Ok(SyncOutcome::Skipped(SkipReason::NotLinked));
        };

        self.calendar.delete_event(event_id)?;
        self.db.set_calendar_link(&task.id, &CalendarLink::Unlinked)?;
        Ok(SyncOutcome::Deleted)
    }

    /// Heartbeat batch: create events for every eligible unlinked task
    /// assigned to `user_id`.
    ///
    /// Tasks are processed sequentially; one task's failure never aborts the
    /// batch. Returns how many tasks gained an event out of those examined.
    pub fn run_batch(&self, user_id: &str, limit: usize) -> Result<BatchReport, SyncError> {
        let tasks = self.db.sync_eligible_unlinked(user_id, limit)?;
        let total = tasks.len();
        let mut synced = 0;

        for task in &tasks {
            match self.create(task) {
                Ok(SyncOutcome::Created { .. }) => synced += 1,
                Ok(outcome) => {
                    tracing::debug!(task = %task.id, ?outcome, "batch sync skipped task");
                }
                Err(e) => {
                    tracing::warn!(task = %task.id, error = %e, "batch sync failed for task; continuing");
                }
            }
        }

        Ok(BatchReport { synced, total })
    }
}
