//! Google Calendar API client for due-date events.

use std::time::Duration;

use crate::sync::event_mapper::CalendarEventBody;
use crate::sync::types::SyncError;

/// Result of a full-replace update against the external calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    /// The remote event was replaced.
    Updated,
    /// The remote event no longer exists (deleted out-of-band).
    Missing,
}

/// External calendar operations used by the reconciler.
///
/// Implementations are single-attempt: no retries, one bounded request per
/// call. A missing remote event on delete is tolerated (idempotent); on
/// update it is reported as [`UpdateStatus::Missing`] so the caller can
/// repair the stale link.
pub trait CalendarApi {
    /// Create an event, returning the id assigned by the external system.
    fn create_event(&self, body: &CalendarEventBody) -> Result<String, SyncError>;

    /// Replace an event wholesale (not a partial patch).
    fn update_event(
        &self,
        event_id: &str,
        body: &CalendarEventBody,
    ) -> Result<UpdateStatus, SyncError>;

    /// Delete an event. Deleting an already-absent id succeeds silently.
    fn delete_event(&self, event_id: &str) -> Result<(), SyncError>;
}

/// Google Calendar API client.
///
/// Drives reqwest from synchronous code via a client-owned runtime; each
/// request carries the configured timeout and is attempted exactly once.
pub struct GoogleCalendarClient {
    http: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    base_url: String,
    calendar_id: String,
    token: String,
}

impl GoogleCalendarClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://www.googleapis.com/calendar/v3";

    /// Client against the production Google Calendar endpoint.
    pub fn new(token: String, calendar_id: String, timeout: Duration) -> Result<Self, SyncError> {
        Self::with_base_url(Self::DEFAULT_BASE_URL.to_string(), token, calendar_id, timeout)
    }

    /// Client against an explicit base URL (tests point this at a local mock).
    pub fn with_base_url(
        base_url: String,
        token: String,
        calendar_id: String,
        timeout: Duration,
    ) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            http,
            runtime,
            base_url: base_url.trim_end_matches('/').to_string(),
            calendar_id,
            token,
        })
    }

    fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(&self.calendar_id)
        )
    }

    fn event_url(&self, event_id: &str) -> String {
        format!("{}/{}", self.events_url(), urlencoding::encode(event_id))
    }

    fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, SyncError> {
        let response = self
            .runtime
            .block_on(async { request.bearer_auth(&self.token).send().await })?;
        Ok(response)
    }

    fn api_error(&self, response: reqwest::Response) -> SyncError {
        let status = response.status().as_u16();
        let message = self
            .runtime
            .block_on(response.text())
            .unwrap_or_default();
        SyncError::Api { status, message }
    }
}

/// Whether a status means "the resource is gone remotely".
fn is_gone(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::NOT_FOUND || status == reqwest::StatusCode::GONE
}

impl CalendarApi for GoogleCalendarClient {
    fn create_event(&self, body: &CalendarEventBody) -> Result<String, SyncError> {
        let response = self.send(self.http.post(self.events_url()).json(&body.to_json()))?;
        if !response.status().is_success() {
            return Err(self.api_error(response));
        }

        let status = response.status().as_u16();
        let json: serde_json::Value = self.runtime.block_on(response.json())?;
        match json["id"].as_str() {
            Some(id) => Ok(id.to_string()),
            None => Err(SyncError::Api {
                status,
                message: "missing event id in response".to_string(),
            }),
        }
    }

    fn update_event(
        &self,
        event_id: &str,
        body: &CalendarEventBody,
    ) -> Result<UpdateStatus, SyncError> {
        let response = self.send(self.http.put(self.event_url(event_id)).json(&body.to_json()))?;
        if is_gone(response.status()) {
            return Ok(UpdateStatus::Missing);
        }
        if !response.status().is_success() {
            return Err(self.api_error(response));
        }
        Ok(UpdateStatus::Updated)
    }

    fn delete_event(&self, event_id: &str) -> Result<(), SyncError> {
        let response = self.send(self.http.delete(self.event_url(event_id)))?;
        if response.status().is_success() || is_gone(response.status()) {
            return Ok(());
        }
        Err(self.api_error(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::event_mapper::event_body;
    use crate::task::Task;
    use chrono::NaiveDate;

    fn client(server: &mockito::ServerGuard) -> GoogleCalendarClient {
        GoogleCalendarClient::with_base_url(
            server.url(),
            "test-token".to_string(),
            "primary".to_string(),
            Duration::from_secs(2),
        )
        .unwrap()
    }

    fn body() -> CalendarEventBody {
        let mut task = Task::new("Quarterly review", "alice");
        task.description = Some("prep slides".to_string());
        event_body(&task, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()).unwrap()
    }

    #[test]
    fn create_returns_assigned_event_id() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/calendars/primary/events")
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_body(r#"{"id": "evt-123"}"#)
            .create();

        let id = client(&server).create_event(&body()).unwrap();
        assert_eq!(id, "evt-123");
        mock.assert();
    }

    #[test]
    fn create_without_id_in_response_is_an_api_error() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/calendars/primary/events")
            .with_status(200)
            .with_body("{}")
            .create();

        let err = client(&server).create_event(&body()).unwrap_err();
        assert!(matches!(err, SyncError::Api { .. }));
    }

    #[test]
    fn create_propagates_non_2xx() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/calendars/primary/events")
            .with_status(403)
            .with_body("forbidden")
            .create();

        let err = client(&server).create_event(&body()).unwrap_err();
        match err {
            SyncError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "forbidden");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn update_reports_missing_on_404() {
        let mut server = mockito::Server::new();
        server
            .mock("PUT", "/calendars/primary/events/evt-9")
            .with_status(404)
            .create();

        let status = client(&server).update_event("evt-9", &body()).unwrap();
        assert_eq!(status, UpdateStatus::Missing);
    }

    #[test]
    fn update_succeeds_on_replace() {
        let mut server = mockito::Server::new();
        server
            .mock("PUT", "/calendars/primary/events/evt-9")
            .with_status(200)
            .with_body(r#"{"id": "evt-9"}"#)
            .create();

        let status = client(&server).update_event("evt-9", &body()).unwrap();
        assert_eq!(status, UpdateStatus::Updated);
    }

    #[test]
    fn delete_tolerates_missing_event() {
        let mut server = mockito::Server::new();
        server
            .mock("DELETE", "/calendars/primary/events/evt-9")
            .with_status(404)
            .create();

        client(&server).delete_event("evt-9").unwrap();
    }

    #[test]
    fn delete_propagates_other_failures() {
        let mut server = mockito::Server::new();
        server
            .mock("DELETE", "/calendars/primary/events/evt-9")
            .with_status(500)
            .create();

        let err = client(&server).delete_event("evt-9").unwrap_err();
        assert!(matches!(err, SyncError::Api { status: 500, .. }));
    }
}
