//! Meeting roster tracked from host participant events.

use crate::host::{Participant, ParticipantId, Role};
use crate::session::state::CastSlot;

/// Join or leave, as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParticipantStatus {
    /// The participant entered the meeting.
    Join,
    /// The participant left the meeting.
    Leave,
}

/// One entry of a host participant-change notification.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantEvent {
    /// Who changed.
    #[serde(flatten)]
    pub participant: Participant,
    /// What happened.
    pub status: ParticipantStatus,
}

/// Participants currently in the meeting, in join order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roster {
    members: Vec<Participant>,
}

impl Roster {
    /// Roster seeded from a host snapshot. Later duplicates replace earlier entries.
    pub fn from_participants(participants: Vec<Participant>) -> Self {
        let mut roster = Self::default();
        for p in participants {
            roster.upsert(p);
        }
        roster
    }

    /// Members in join order.
    pub fn members(&self) -> &[Participant] {
        &self.members
    }

    /// Return `true` when `id` is in the meeting.
    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.members.iter().any(|p| &p.participant_id == id)
    }

    /// Apply host events in order and return the ids that left.
    pub fn apply(&mut self, events: &[ParticipantEvent]) -> Vec<ParticipantId> {
        let mut left = Vec::new();
        for ev in events {
            match ev.status {
                ParticipantStatus::Join => self.upsert(ev.participant.clone()),
                ParticipantStatus::Leave => {
                    let id = &ev.participant.participant_id;
                    let before = self.members.len();
                    self.members.retain(|p| &p.participant_id != id);
                    if self.members.len() != before {
                        left.push(id.clone());
                    } else {
                        tracing::debug!(participant = %id, "leave for unknown participant");
                    }
                }
            }
        }
        left
    }

    /// Initial cast: the meeting host first, then everyone else in join order, up to `capacity`.
    pub fn default_cast(&self, capacity: usize) -> Vec<CastSlot> {
        let hosts = self.members.iter().filter(|p| p.role == Role::Host);
        let rest = self.members.iter().filter(|p| p.role != Role::Host);
        hosts
            .chain(rest)
            .take(capacity)
            .map(CastSlot::for_participant)
            .collect()
    }

    fn upsert(&mut self, p: Participant) {
        match self
            .members
            .iter_mut()
            .find(|m| m.participant_id == p.participant_id)
        {
            Some(m) => *m = p,
            None => self.members.push(p),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/roster.rs"]
mod tests;
