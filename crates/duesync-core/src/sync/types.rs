//! Core types for calendar synchronization.

use serde::Serialize;

/// Caller intent for a single-task sync operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Create,
    Update,
    Delete,
}

/// Reason a sync operation was a deliberate no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The task has no due date; nothing to put on a calendar.
    NoDueDate,
    /// The task has no linked event and no explicit event id was given.
    NotLinked,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoDueDate => write!(f, "no due date"),
            SkipReason::NotLinked => write!(f, "no linked calendar event"),
        }
    }
}

/// Outcome of a single-task sync operation.
///
/// Skips and drift heals are successful outcomes, not errors -- the caller
/// should not be alarmed by expected conditions.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// A new event was created and linked to the task.
    Created { event_id: String },
    /// The linked event was replaced with the task's current state.
    Updated { event_id: String },
    /// The event was removed and the link cleared.
    Deleted,
    /// Nothing to do.
    Skipped(SkipReason),
    /// The remote event was gone (deleted out-of-band); the stale link was
    /// cleared. The event is not recreated automatically.
    DriftHealed { warning: String },
}

impl SyncOutcome {
    /// The external event id this outcome refers to, if any.
    pub fn event_id(&self) -> Option<&str> {
        match self {
            SyncOutcome::Created { event_id } | SyncOutcome::Updated { event_id } => {
                Some(event_id)
            }
            _ => None,
        }
    }

    /// Warning text for drift-healed outcomes.
    pub fn warning(&self) -> Option<&str> {
        match self {
            SyncOutcome::DriftHealed { warning } => Some(warning),
            _ => None,
        }
    }
}

/// Aggregate result of a batch sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Tasks for which an event was created this run.
    pub synced: usize,
    /// Eligible tasks examined this run.
    pub total: usize,
}

/// Sync error types.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Google Calendar is not connected")]
    NotConnected,

    #[error("Calendar API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed due date: {0:?}")]
    MalformedDate(String),

    #[error("Task has no linked calendar event")]
    NotLinked,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
