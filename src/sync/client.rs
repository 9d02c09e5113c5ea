use crate::foundation::error::{QuadviewError, QuadviewResult};
use crate::host::HostSurface;
use crate::session::layout_session::{LayoutSession, LayoutUpdate};
use crate::session::state::{LayoutChanges, LayoutState};
use crate::sync::protocol::{ClientMessage, JoinRequest, ServerMessage, SnapshotFields, UpdateRequest};

/// Client side of the relay for one meeting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncClient {
    meeting_uuid: String,
}

impl SyncClient {
    /// Client for `meeting_uuid`, which must not be blank.
    pub fn new(meeting_uuid: impl Into<String>) -> QuadviewResult<Self> {
        let meeting_uuid = meeting_uuid.into();
        if meeting_uuid.is_empty() {
            return Err(QuadviewError::invalid_argument("meeting UUID cannot be blank"));
        }
        Ok(Self { meeting_uuid })
    }

    /// Meeting this client talks about.
    pub fn meeting_uuid(&self) -> &str {
        &self.meeting_uuid
    }

    /// `join` for this meeting.
    pub fn join_message(&self) -> ClientMessage {
        ClientMessage::Join(JoinRequest {
            meeting_uuid: Some(self.meeting_uuid.clone()),
        })
    }

    /// `sendUpdate` carrying the cast, color and topic of `layout`.
    pub fn update_message(&self, layout: &LayoutState) -> ClientMessage {
        ClientMessage::SendUpdate(UpdateRequest {
            meeting_uuid: Some(self.meeting_uuid.clone()),
            fields: SnapshotFields {
                participants: Some(layout.cast.slots().to_vec()),
                topic: Some(layout.topic.clone()),
                color: Some(layout.color),
            },
        })
    }

    /// Apply a relay message to `session`.
    ///
    /// Present fields of an `update` are applied as cast, color, topic, each replacing the local
    /// value. An `error` becomes [`QuadviewError::Protocol`].
    pub fn apply<H: HostSurface>(
        &self,
        msg: ServerMessage,
        session: &mut LayoutSession<H>,
    ) -> QuadviewResult<LayoutChanges> {
        match msg {
            ServerMessage::Update(fields) => {
                tracing::debug!(meeting = %self.meeting_uuid, "applying peer snapshot");
                session.apply_update(LayoutUpdate {
                    cast: fields.participants,
                    color: fields.color,
                    topic: fields.topic,
                })
            }
            ServerMessage::Error(e) => {
                tracing::warn!(code = e.code, message = %e.message, "relay rejected message");
                Err(QuadviewError::protocol(e.code, e.message))
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sync/client.rs"]
mod tests;
