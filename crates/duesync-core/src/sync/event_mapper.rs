//! Pure mapping from task due dates to all-day calendar events.
//!
//! All-day events use the external API's half-open date convention: the end
//! date is exclusive, so a one-day event due on `d` spans `[d, d + 1)`.

use chrono::NaiveDate;
use serde_json::json;

use crate::sync::types::SyncError;
use crate::task::Task;

/// An all-day event payload ready for the calendar API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEventBody {
    pub summary: String,
    pub description: String,
    /// First day of the event.
    pub start_date: NaiveDate,
    /// Day after the last day of the event (exclusive).
    pub end_date: NaiveDate,
}

impl CalendarEventBody {
    /// Wire representation for the events endpoint.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "summary": self.summary,
            "description": self.description,
            "start": { "date": self.start_date.format("%Y-%m-%d").to_string() },
            "end": { "date": self.end_date.format("%Y-%m-%d").to_string() },
        })
    }
}

/// Parse an ISO calendar date (`YYYY-MM-DD`).
pub fn parse_due_date(s: &str) -> Result<NaiveDate, SyncError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| SyncError::MalformedDate(s.to_string()))
}

/// Half-open date range for a one-day all-day event due on `due`.
pub fn all_day_range(due: NaiveDate) -> Result<(NaiveDate, NaiveDate), SyncError> {
    let end = due
        .succ_opt()
        .ok_or_else(|| SyncError::MalformedDate(due.to_string()))?;
    Ok((due, end))
}

/// Build the event payload for a task due on `due`.
///
/// Callers check eligibility first; a task with no due date is never mapped.
pub fn event_body(task: &Task, due: NaiveDate) -> Result<CalendarEventBody, SyncError> {
    let (start_date, end_date) = all_day_range(due)?;
    Ok(CalendarEventBody {
        summary: task.title.clone(),
        description: task.description.clone().unwrap_or_default(),
        start_date,
        end_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn end_date_is_exclusive_next_day() {
        let (start, end) = all_day_range(date(2025, 3, 10)).unwrap();
        assert_eq!(start, date(2025, 3, 10));
        assert_eq!(end, date(2025, 3, 11));
    }

    #[test]
    fn leap_day_rolls_into_march() {
        let (_, end) = all_day_range(date(2024, 2, 29)).unwrap();
        assert_eq!(end, date(2024, 3, 1));
    }

    #[test]
    fn year_boundary_rolls_over() {
        let (_, end) = all_day_range(date(2025, 12, 31)).unwrap();
        assert_eq!(end, date(2026, 1, 1));
    }

    #[test]
    fn event_body_mirrors_task_fields() {
        let mut task = Task::new("Ship release", "alice");
        task.description = Some("cut the tag".to_string());

        let body = event_body(&task, date(2025, 3, 10)).unwrap();
        assert_eq!(body.summary, "Ship release");
        assert_eq!(body.description, "cut the tag");

        let json = body.to_json();
        assert_eq!(json["start"]["date"], "2025-03-10");
        assert_eq!(json["end"]["date"], "2025-03-11");
    }

    #[test]
    fn event_body_tolerates_missing_description() {
        let task = Task::new("No notes", "alice");
        let body = event_body(&task, date(2025, 6, 1)).unwrap();
        assert_eq!(body.description, "");
    }

    #[test]
    fn parse_due_date_accepts_iso_and_rejects_garbage() {
        assert_eq!(parse_due_date("2025-06-02").unwrap(), date(2025, 6, 2));
        assert_eq!(parse_due_date(" 2025-06-02 ").unwrap(), date(2025, 6, 2));
        assert!(matches!(
            parse_due_date("tomorrow"),
            Err(SyncError::MalformedDate(_))
        ));
        assert!(matches!(
            parse_due_date("2025-02-30"),
            Err(SyncError::MalformedDate(_))
        ));
    }

    proptest! {
        #[test]
        fn range_is_always_one_day(y in 1970i32..2200, ord in 1u32..=365) {
            let due = NaiveDate::from_yo_opt(y, ord).unwrap();
            let (start, end) = all_day_range(due).unwrap();
            prop_assert_eq!(start, due);
            prop_assert_eq!(end - start, chrono::Duration::days(1));
            // Day-of-year either advances by one or wraps to Jan 1.
            prop_assert!(end.ordinal() == due.ordinal() + 1 || (end.ordinal() == 1 && end.year() == y + 1));
        }
    }
}
