//! JSON wire messages exchanged with the relay: `{"event": <name>, "data": {...}}`.

use crate::foundation::core::Color;
use crate::foundation::error::QuadviewResult;
use crate::session::state::CastSlot;

/// Shared layout fields. Absent fields mean "unchanged".
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFields {
    /// The cast, in slot order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<CastSlot>>,
    /// Topic text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Background color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl SnapshotFields {
    /// Return `true` when no field is present.
    pub fn is_empty(&self) -> bool {
        self.participants.is_none() && self.topic.is_none() && self.color.is_none()
    }
}

/// Payload of `join`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct JoinRequest {
    /// Meeting to join.
    #[serde(rename = "meetingUUID", default)]
    pub meeting_uuid: Option<String>,
}

/// Payload of `sendUpdate`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UpdateRequest {
    /// Meeting the update belongs to.
    #[serde(rename = "meetingUUID", default)]
    pub meeting_uuid: Option<String>,
    /// Fields to merge.
    #[serde(flatten)]
    pub fields: SnapshotFields,
}

/// Client to relay.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Enter a meeting's room and receive its snapshot.
    Join(JoinRequest),
    /// Merge fields into the room snapshot and fan it out.
    SendUpdate(UpdateRequest),
}

/// Payload of `error`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorPayload {
    /// HTTP-style status code.
    pub code: u16,
    /// Human readable reason.
    pub message: String,
}

/// Relay to client.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Current room snapshot.
    Update(SnapshotFields),
    /// The sender's message was rejected.
    Error(ErrorPayload),
}

impl ClientMessage {
    /// Wire name of the event.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Join(_) => "join",
            Self::SendUpdate(_) => "sendUpdate",
        }
    }

    /// Parse one JSON message.
    pub fn from_json(s: &str) -> QuadviewResult<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

impl ServerMessage {
    /// Parse one JSON message.
    pub fn from_json(s: &str) -> QuadviewResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Serialize to one JSON line.
    pub fn to_json(&self) -> QuadviewResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sync/protocol.rs"]
mod tests;
