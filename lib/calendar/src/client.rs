//! Calendar service boundary and the Nylas HTTP client.
//!
//! Both calls are synchronous-style network operations returning a
//! boolean outcome. Any transport or HTTP error is reported as
//! `false`/unavailable, never propagated as a distinct error to the
//! caller; the contact operations map the boolean into their own named
//! outcomes.

use crate::error::ClientError;
use crate::window::MeetingWindow;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// An event creation request.
#[derive(Debug, Clone)]
pub struct EventRequest {
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// The scheduling window.
    pub window: MeetingWindow,
    /// IANA timezone label for both ends of the window.
    pub timezone: String,
    /// Event location.
    pub location: String,
    /// Participant email address.
    pub participant_email: String,
    /// Participant display name.
    pub participant_name: String,
}

/// Trait for the external calendar service.
#[async_trait]
pub trait CalendarService: Send + Sync {
    /// Checks whether the window is free of conflicting events.
    ///
    /// Returns false when the slot is taken or the service could not be
    /// reached.
    async fn check_availability(&self, window: &MeetingWindow) -> bool;

    /// Creates an event for the window.
    ///
    /// Returns false when creation failed for any reason.
    async fn create_event(&self, event: &EventRequest) -> bool;
}

/// Configuration for the Nylas calendar client.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NylasConfig {
    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// The Nylas grant to operate under.
    pub grant_id: String,
    /// The calendar to check and book against.
    pub calendar_id: String,
    /// Bearer token for the API.
    pub api_token: String,
    /// Request timeout in seconds. External calls must not stall the
    /// session's turn sequence indefinitely.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.us.nylas.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Nylas-backed calendar service.
#[derive(Debug)]
pub struct NylasCalendar {
    client: reqwest::Client,
    config: NylasConfig,
}

/// Response shape for the events listing endpoint.
#[derive(Debug, Deserialize)]
struct EventsResponse {
    data: Vec<EventEntry>,
}

#[derive(Debug, Deserialize)]
struct EventEntry {
    when: Option<EventWhen>,
}

#[derive(Debug, Deserialize)]
struct EventWhen {
    start_time: i64,
    end_time: i64,
}

impl NylasCalendar {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is incomplete or the HTTP
    /// client cannot be constructed.
    pub fn new(config: NylasConfig) -> Result<Self, ClientError> {
        for (field, value) in [
            ("grant_id", &config.grant_id),
            ("calendar_id", &config.calendar_id),
            ("api_token", &config.api_token),
        ] {
            if value.trim().is_empty() {
                return Err(ClientError::InvalidConfig {
                    reason: format!("empty {field}"),
                });
            }
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::InvalidConfig {
                reason: e.to_string(),
            })?;

        Ok(Self { client, config })
    }

    fn events_url(&self) -> String {
        format!(
            "{}/v3/grants/{}/events",
            self.config.base_url.trim_end_matches('/'),
            self.config.grant_id
        )
    }

    /// Fetches upcoming events for the overlap check.
    async fn list_events(&self) -> Result<Vec<EventEntry>, reqwest::Error> {
        let response = self
            .client
            .get(self.events_url())
            .bearer_auth(&self.config.api_token)
            .query(&[
                ("calendar_id", self.config.calendar_id.as_str()),
                ("limit", "3"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let events: EventsResponse = response.json().await?;
        Ok(events.data)
    }
}

#[async_trait]
impl CalendarService for NylasCalendar {
    async fn check_availability(&self, window: &MeetingWindow) -> bool {
        let events = match self.list_events().await {
            Ok(events) => events,
            Err(e) => {
                tracing::error!(error = %e, "calendar availability check failed");
                return false;
            }
        };

        for event in &events {
            if let Some(when) = &event.when {
                if window.overlaps_epochs(when.start_time, when.end_time) {
                    return false;
                }
            }
        }

        true
    }

    async fn create_event(&self, event: &EventRequest) -> bool {
        let payload = serde_json::json!({
            "calendar_id": self.config.calendar_id,
            "title": event.title,
            "description": event.description,
            "when": {
                "start_time": event.window.start_epoch(),
                "end_time": event.window.end_epoch(),
                "start_timezone": event.timezone,
                "end_timezone": event.timezone,
            },
            "location": event.location,
            "participants": [
                {"email": event.participant_email, "name": event.participant_name}
            ],
            "busy": true,
            "visibility": "public",
        });

        let result = self
            .client
            .post(self.events_url())
            .bearer_auth(&self.config.api_token)
            .query(&[("calendar_id", self.config.calendar_id.as_str())])
            .json(&payload)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);

        match result {
            Ok(_) => {
                tracing::info!(participant = %event.participant_name, "meeting scheduled");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "event creation failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> NylasConfig {
        NylasConfig {
            base_url: "https://api.us.nylas.com/".to_string(),
            grant_id: "grant".to_string(),
            calendar_id: "cal".to_string(),
            api_token: "token".to_string(),
            timeout_secs: 10,
        }
    }

    #[test]
    fn config_defaults() {
        let parsed: NylasConfig = serde_json::from_value(serde_json::json!({
            "grant_id": "g",
            "calendar_id": "c",
            "api_token": "t",
        }))
        .expect("deserialize");

        assert_eq!(parsed.base_url, "https://api.us.nylas.com");
        assert_eq!(parsed.timeout_secs, 10);
    }

    #[test]
    fn client_rejects_empty_token() {
        let mut cfg = config();
        cfg.api_token = String::new();
        let err = NylasCalendar::new(cfg).unwrap_err();
        assert!(err.to_string().contains("api_token"));
    }

    #[test]
    fn events_url_strips_trailing_slash() {
        let calendar = NylasCalendar::new(config()).expect("client");
        assert_eq!(
            calendar.events_url(),
            "https://api.us.nylas.com/v3/grants/grant/events"
        );
    }
}
