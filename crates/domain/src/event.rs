//! Events — immutable records of engine activity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{EntityId, EventId};
use crate::time::{Timestamp, now};

/// What kind of thing happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SceneActivated,
    SceneDeactivated,
    CommandIssued,
    OverrideDetected,
    AdjustmentsStopped,
    AdjustmentsResumed,
    TimeshiftChanged,
    ScenesReloaded,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::SceneActivated => "scene_activated",
            Self::SceneDeactivated => "scene_deactivated",
            Self::CommandIssued => "command_issued",
            Self::OverrideDetected => "override_detected",
            Self::AdjustmentsStopped => "adjustments_stopped",
            Self::AdjustmentsResumed => "adjustments_resumed",
            Self::TimeshiftChanged => "timeshift_changed",
            Self::ScenesReloaded => "scenes_reloaded",
        };
        f.write_str(label)
    }
}

/// An immutable record of something the engine did or observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub event_type: EventType,
    pub entity_id: Option<EntityId>,
    pub data: serde_json::Value,
    pub timestamp: Timestamp,
}

impl Event {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(
        event_type: EventType,
        entity_id: Option<EntityId>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            entity_id,
            data,
            timestamp: now(),
        }
    }
}
