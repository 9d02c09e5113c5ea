//! In-process relay room table. Transport agnostic: callers feed messages in and deliver the
//! returned [`Outgoing`] list.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::foundation::error::{QuadviewError, QuadviewResult};
use crate::sync::protocol::{ClientMessage, ErrorPayload, ServerMessage, SnapshotFields};

/// A connected peer.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct PeerId(pub u64);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer-{}", self.0)
    }
}

/// A message to deliver to one peer.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Outgoing {
    /// Recipient.
    pub to: PeerId,
    /// Message body.
    pub message: ServerMessage,
}

/// Last merged layout of one meeting.
#[derive(Clone, Debug, PartialEq)]
pub struct RoomSnapshot {
    /// Meeting the snapshot belongs to.
    pub meeting_uuid: String,
    /// Merged fields.
    pub fields: SnapshotFields,
}

impl RoomSnapshot {
    /// Merge `update`: every present field that differs from the stored one replaces it.
    /// An empty topic counts as absent. Returns `true` when anything changed.
    fn merge(&mut self, update: SnapshotFields) -> bool {
        fn take<T: PartialEq>(slot: &mut Option<T>, v: Option<T>) -> bool {
            match v {
                Some(v) if slot.as_ref() != Some(&v) => {
                    *slot = Some(v);
                    true
                }
                _ => false,
            }
        }
        let p = take(&mut self.fields.participants, update.participants);
        let t = take(
            &mut self.fields.topic,
            update.topic.filter(|t| !t.is_empty()),
        );
        let c = take(&mut self.fields.color, update.color);
        p || t || c
    }
}

const BLANK_MEETING: &str = "Meeting UUID cannot be blank";

/// Rooms keyed by meeting id plus the peers connected to them.
#[derive(Debug, Default)]
pub struct Relay {
    next_peer: u64,
    /// Peer to the room it joined, `None` before its first join/update.
    peers: BTreeMap<PeerId, Option<String>>,
    rooms: HashMap<String, RoomSnapshot>,
}

impl Relay {
    /// Empty relay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new peer.
    pub fn connect(&mut self) -> PeerId {
        self.next_peer += 1;
        let id = PeerId(self.next_peer);
        self.peers.insert(id, None);
        tracing::debug!(peer = %id, "connected");
        id
    }

    /// Drop a peer. The room snapshot is deleted once its last peer is gone; nothing is sent to
    /// the peers that remain.
    pub fn disconnect(&mut self, peer: PeerId) -> Vec<Outgoing> {
        let Some(room) = self.peers.remove(&peer).flatten() else {
            return Vec::new();
        };
        let empty = self.members(&room).next().is_none();
        if empty && self.rooms.remove(&room).is_some() {
            tracing::debug!(room = %room, "room emptied, snapshot dropped");
        }
        Vec::new()
    }

    /// Snapshot of `meeting_uuid`, if one was created.
    pub fn snapshot(&self, meeting_uuid: &str) -> Option<&RoomSnapshot> {
        self.rooms.get(meeting_uuid)
    }

    /// Room `peer` is in.
    pub fn room_of(&self, peer: PeerId) -> Option<&str> {
        self.peers.get(&peer).and_then(|r| r.as_deref())
    }

    /// Number of rooms with a snapshot.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Handle one message from `peer` and return what to send to whom.
    ///
    /// A blank meeting id is answered with an `error` to the sender only and changes nothing.
    #[tracing::instrument(level = "debug", skip(self, msg), fields(event = msg.event_name()))]
    pub fn handle(&mut self, peer: PeerId, msg: ClientMessage) -> QuadviewResult<Vec<Outgoing>> {
        if !self.peers.contains_key(&peer) {
            return Err(QuadviewError::invalid_argument(format!("{peer} is not connected")));
        }
        let uuid = match &msg {
            ClientMessage::Join(j) => j.meeting_uuid.as_deref(),
            ClientMessage::SendUpdate(u) => u.meeting_uuid.as_deref(),
        };
        let Some(uuid) = uuid.filter(|u| !u.is_empty()).map(str::to_owned) else {
            tracing::warn!(peer = %peer, "rejected message without meeting id");
            return Ok(vec![Outgoing {
                to: peer,
                message: ServerMessage::Error(ErrorPayload {
                    code: 400,
                    message: BLANK_MEETING.to_owned(),
                }),
            }]);
        };
        let room = self.enter(peer, uuid);

        match msg {
            ClientMessage::Join(_) => Ok(self
                .rooms
                .get(&room)
                .map(|s| Outgoing {
                    to: peer,
                    message: ServerMessage::Update(s.fields.clone()),
                })
                .into_iter()
                .collect()),
            ClientMessage::SendUpdate(u) => {
                let snapshot = self
                    .rooms
                    .entry(room.clone())
                    .or_insert_with(|| RoomSnapshot {
                        meeting_uuid: room.clone(),
                        fields: SnapshotFields::default(),
                    });
                let changed = snapshot.merge(u.fields);
                let fields = snapshot.fields.clone();
                tracing::debug!(room = %room, changed, "snapshot merged");
                Ok(self
                    .members(&room)
                    .filter(|&p| p != peer)
                    .map(|to| Outgoing {
                        to,
                        message: ServerMessage::Update(fields.clone()),
                    })
                    .collect())
            }
        }
    }

    /// Put `peer` in `uuid` unless it already joined a room; returns the room it is in.
    fn enter(&mut self, peer: PeerId, uuid: String) -> String {
        let room = self
            .peers
            .entry(peer)
            .or_default()
            .get_or_insert_with(|| uuid.clone())
            .clone();
        if room != uuid {
            tracing::debug!(peer = %peer, room = %room, requested = %uuid, "peer stays in its first room");
        }
        room
    }

    fn members<'a>(&'a self, room: &'a str) -> impl Iterator<Item = PeerId> + 'a {
        self.peers
            .iter()
            .filter(move |(_, r)| r.as_deref() == Some(room))
            .map(|(&p, _)| p)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sync/relay.rs"]
mod tests;
