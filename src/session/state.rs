use std::collections::{BTreeMap, BTreeSet};

use crate::foundation::core::{Color, QuadrantIndex};
use crate::host::{ImageHandle, Participant, ParticipantHandle, ParticipantId, Role};

/// One displayed participant (or an empty seat) in the cast.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastSlot {
    /// Quadrant the slot is shown in. Assigned from the slot's position by [`Cast::new`].
    #[serde(default = "first_quadrant")]
    pub quadrant_index: QuadrantIndex,
    /// Who is shown; `None` leaves the card empty.
    #[serde(default)]
    pub participant_id: Option<ParticipantId>,
    /// Role of the participant, when known.
    #[serde(default)]
    pub role: Option<Role>,
    /// Display name.
    #[serde(default)]
    pub screen_name: String,
}

fn first_quadrant() -> QuadrantIndex {
    QuadrantIndex::ALL[0]
}

impl CastSlot {
    /// A slot showing `p`.
    pub fn for_participant(p: &Participant) -> Self {
        Self {
            quadrant_index: first_quadrant(),
            participant_id: Some(p.participant_id.clone()),
            role: Some(p.role.clone()),
            screen_name: p.screen_name.clone(),
        }
    }

    /// An empty seat.
    pub fn empty() -> Self {
        Self {
            quadrant_index: first_quadrant(),
            participant_id: None,
            role: None,
            screen_name: String::new(),
        }
    }
}

/// Ordered cast of at most [`Cast::CAPACITY`] slots.
///
/// No participant appears in more than one slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct Cast {
    slots: Vec<CastSlot>,
}

impl Cast {
    /// Number of quadrants available to participants.
    pub const CAPACITY: usize = 3;

    /// Normalize `slots`: clamp to capacity, assign quadrants by position, and empty any slot whose
    /// participant already appears in an earlier slot.
    pub fn new(slots: Vec<CastSlot>, quadrants: [QuadrantIndex; 3]) -> Self {
        let mut seen = BTreeSet::new();
        let slots = slots
            .into_iter()
            .take(Self::CAPACITY)
            .zip(quadrants)
            .map(|(mut slot, q)| {
                slot.quadrant_index = q;
                if let Some(id) = &slot.participant_id
                    && !seen.insert(id.clone())
                {
                    tracing::debug!(participant = %id, "duplicate cast entry emptied");
                    slot.participant_id = None;
                    slot.role = None;
                    slot.screen_name.clear();
                }
                slot
            })
            .collect();
        Self { slots }
    }

    /// Slots in order.
    pub fn slots(&self) -> &[CastSlot] {
        &self.slots
    }

    /// Participant at slot `i`, if any.
    pub fn participant_at(&self, i: usize) -> Option<&ParticipantId> {
        self.slots.get(i).and_then(|s| s.participant_id.as_ref())
    }

    /// Slot index showing `id`.
    pub fn position_of(&self, id: &ParticipantId) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.participant_id.as_ref() == Some(id))
    }

    /// Participant shown in quadrant `q`, if any.
    pub fn participant_in(&self, q: QuadrantIndex) -> Option<&ParticipantId> {
        self.slots
            .iter()
            .find(|s| s.quadrant_index == q)
            .and_then(|s| s.participant_id.as_ref())
    }

    /// Quadrants whose participant differs between `self` and `next`, compared by participant id
    /// per slot position.
    pub fn changed_quadrants(&self, next: &Cast) -> BTreeSet<QuadrantIndex> {
        let n = self.slots.len().max(next.slots.len());
        (0..n)
            .filter(|&i| {
                self.participant_at(i) != next.participant_at(i)
                    || self.slots.get(i).map(|s| s.quadrant_index)
                        != next.slots.get(i).map(|s| s.quadrant_index)
            })
            .flat_map(|i| {
                [self.slots.get(i), next.slots.get(i)]
                    .into_iter()
                    .flatten()
                    .map(|s| s.quadrant_index)
            })
            .collect()
    }

    /// Drop `id` from the cast, leaving its seat empty. Returns `true` when it was present.
    pub fn vacate(&mut self, id: &ParticipantId) -> bool {
        let Some(i) = self.position_of(id) else {
            return false;
        };
        let q = self.slots[i].quadrant_index;
        self.slots[i] = CastSlot {
            quadrant_index: q,
            ..CastSlot::empty()
        };
        true
    }
}

/// Which parts of the layout changed in one update.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutChanges {
    /// Topic text differs.
    pub topic_changed: bool,
    /// Background color differs.
    pub color_changed: bool,
    /// Quadrants whose participant changed.
    pub cast_changed: BTreeSet<QuadrantIndex>,
}

/// What the redraw controller has to do for a set of changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RedrawPlan {
    /// Nothing visible changed.
    Nothing,
    /// Clear and redraw every quadrant.
    Full,
    /// Redraw only some quadrants.
    Partial {
        /// Quadrants whose image must be re-rasterized.
        images: BTreeSet<QuadrantIndex>,
        /// Quadrants whose participant placement must be replaced.
        participants: BTreeSet<QuadrantIndex>,
    },
}

impl LayoutChanges {
    /// Return `true` when nothing changed.
    pub fn is_empty(&self) -> bool {
        !self.topic_changed && !self.color_changed && self.cast_changed.is_empty()
    }

    /// Decide the cheapest redraw covering these changes.
    ///
    /// A color change repaints every background, so it always means a full redraw (this also
    /// covers the case where topic, color and cast all changed). Otherwise a topic change touches
    /// only the branding quadrant and a cast change only the seats that changed.
    pub fn plan(&self, branding: QuadrantIndex) -> RedrawPlan {
        if self.color_changed {
            return RedrawPlan::Full;
        }
        if self.is_empty() {
            return RedrawPlan::Nothing;
        }
        let mut images = BTreeSet::new();
        if self.topic_changed {
            images.insert(branding);
        }
        RedrawPlan::Partial {
            images,
            participants: self.cast_changed.clone(),
        }
    }
}

/// Everything the session has put on screen plus the inputs it was drawn from.
#[derive(Clone, Debug, Default)]
pub struct LayoutState {
    /// Displayed participants.
    pub cast: Cast,
    /// Background color of every quadrant.
    pub color: Color,
    /// Text on the branding card.
    pub topic: String,
    pub(crate) drawn_images: BTreeMap<QuadrantIndex, ImageHandle>,
    pub(crate) drawn_participants: BTreeMap<QuadrantIndex, (ParticipantId, ParticipantHandle)>,
}

impl LayoutState {
    /// Live image handles by quadrant.
    pub fn drawn_images(&self) -> &BTreeMap<QuadrantIndex, ImageHandle> {
        &self.drawn_images
    }

    /// Live participant placements by quadrant.
    pub fn drawn_participants(&self) -> &BTreeMap<QuadrantIndex, (ParticipantId, ParticipantHandle)> {
        &self.drawn_participants
    }

    /// Topic as an optional, ignoring blank text.
    pub fn topic_text(&self) -> Option<&str> {
        let t = self.topic.trim();
        (!t.is_empty()).then_some(t)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/state.rs"]
mod tests;
