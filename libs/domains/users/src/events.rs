//! Domain events emitted after successful mutations.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::changeset::UserField;

pub const EVENT_TARGET: &str = "user_events";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UserEvent {
    Created {
        id: Uuid,
        at: DateTime<Utc>,
    },
    Updated {
        id: Uuid,
        fields: Vec<UserField>,
        at: DateTime<Utc>,
    },
    Deleted {
        id: Uuid,
        at: DateTime<Utc>,
    },
}

impl UserEvent {
    pub fn user_id(&self) -> Uuid {
        match self {
            Self::Created { id, .. } | Self::Updated { id, .. } | Self::Deleted { id, .. } => *id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "user.created",
            Self::Updated { .. } => "user.updated",
            Self::Deleted { .. } => "user.deleted",
        }
    }
}

/// Sink for user domain events, injected into the service
pub trait UserEventSink: Send + Sync + 'static {
    fn emit(&self, event: &UserEvent);
}

/// Writes events to the `user_events` tracing target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl UserEventSink for TracingEventSink {
    fn emit(&self, event: &UserEvent) {
        let payload = serde_json::to_string(event).unwrap_or_default();
        tracing::info!(
            target: EVENT_TARGET,
            event = event.name(),
            user_id = %event.user_id(),
            payload = %payload,
            "User event"
        );
    }
}

/// Keeps every emitted event in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingEventSink {
    events: Arc<Mutex<Vec<UserEvent>>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<UserEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl UserEventSink for RecordingEventSink {
    fn emit(&self, event: &UserEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let id = Uuid::now_v7();
        let event = UserEvent::Updated {
            id,
            fields: vec![UserField::Email],
            at: Utc::now(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "updated");
        assert_eq!(json["fields"][0], "email");
        assert_eq!(event.user_id(), id);
        assert_eq!(event.name(), "user.updated");
    }

    #[test]
    fn test_recording_sink() {
        let sink = RecordingEventSink::new();
        let id = Uuid::now_v7();
        sink.emit(&UserEvent::Deleted { id, at: Utc::now() });

        let events = sink.clone().events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].user_id(), id);
    }
}
