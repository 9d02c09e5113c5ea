//! Boundary to the host client's rendering surface and runtime.
//!
//! The host owns the real screen. This crate only hands it pixel buffers and participant
//! placements, and must clear every handle it was given.

pub mod recording;

use std::fmt;

use crate::compositor::{DrawOperation, ParticipantPlacement};
use crate::foundation::error::QuadviewResult;

/// Stable participant identifier assigned by the host.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Meeting role as reported by the host.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Meeting owner; the only role allowed to start the immersive layout.
    Host,
    /// Co-host.
    CoHost,
    /// Regular attendee.
    Attendee,
    /// Any role this crate does not know about.
    Other(String),
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "host" => Self::Host,
            "coHost" | "cohost" => Self::CoHost,
            "attendee" => Self::Attendee,
            _ => Self::Other(s),
        }
    }
}

impl From<Role> for String {
    fn from(r: Role) -> Self {
        match r {
            Role::Host => "host".to_owned(),
            Role::CoHost => "coHost".to_owned(),
            Role::Attendee => "attendee".to_owned(),
            Role::Other(s) => s,
        }
    }
}

/// Where the app is currently running inside the host client.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunningContext {
    /// Side panel of a live meeting.
    InMeeting,
    /// The immersive rendering context is running.
    InImmersive,
    /// Outside any meeting.
    InClient,
    /// Any context this crate does not know about.
    Other(String),
}

impl RunningContext {
    /// Return `true` for contexts that sit inside a live meeting.
    pub fn is_meeting(&self) -> bool {
        matches!(self, Self::InMeeting | Self::InImmersive)
    }
}

impl From<String> for RunningContext {
    fn from(s: String) -> Self {
        match s.as_str() {
            "inMeeting" => Self::InMeeting,
            "inImmersive" => Self::InImmersive,
            "inClient" => Self::InClient,
            _ => Self::Other(s),
        }
    }
}

impl From<RunningContext> for String {
    fn from(c: RunningContext) -> Self {
        match c {
            RunningContext::InMeeting => "inMeeting".to_owned(),
            RunningContext::InImmersive => "inImmersive".to_owned(),
            RunningContext::InClient => "inClient".to_owned(),
            RunningContext::Other(s) => s,
        }
    }
}

/// A meeting participant (also the shape of the local user context).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Host-assigned identifier.
    pub participant_id: ParticipantId,
    /// Meeting role.
    pub role: Role,
    /// Display name.
    #[serde(default)]
    pub screen_name: String,
}

impl Participant {
    /// Convenience constructor.
    pub fn new(id: impl Into<String>, role: Role, screen_name: impl Into<String>) -> Self {
        Self {
            participant_id: ParticipantId::new(id),
            role,
            screen_name: screen_name.into(),
        }
    }
}

/// The local user as reported by the host.
pub type UserContext = Participant;

/// Local camera size reported by the host's media change events.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMedia {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Opaque handle for an image drawn on the host surface.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ImageHandle(pub u64);

/// Opaque handle for a participant video drawn on the host surface.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ParticipantHandle(pub u64);

/// Rendering view requested from the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RenderingView {
    /// Full-screen layout composed by the app.
    Immersive,
    /// The host's normal camera view.
    Camera,
}

/// The host client's drawing surface and runtime queries.
///
/// Every method is a round-trip to the host and may be rejected with
/// [`crate::QuadviewError::HostCall`]. Coordinates are logical pixels.
pub trait HostSurface {
    /// Draw a pixel buffer and return a handle that must eventually be cleared.
    fn draw_image(&mut self, op: &DrawOperation) -> QuadviewResult<ImageHandle>;

    /// Remove a previously drawn image.
    fn clear_image(&mut self, handle: ImageHandle) -> QuadviewResult<()>;

    /// Place a participant's live video and return a handle that must eventually be cleared.
    fn draw_participant(
        &mut self,
        placement: &ParticipantPlacement,
    ) -> QuadviewResult<ParticipantHandle>;

    /// Remove a previously placed participant video.
    fn clear_participant(&mut self, handle: ParticipantHandle) -> QuadviewResult<()>;

    /// Where the app is running.
    fn running_context(&mut self) -> QuadviewResult<RunningContext>;

    /// The local user.
    fn user_context(&mut self) -> QuadviewResult<UserContext>;

    /// Current meeting roster.
    fn meeting_participants(&mut self) -> QuadviewResult<Vec<Participant>>;

    /// Switch the host into the given rendering view.
    fn run_rendering_context(&mut self, view: RenderingView) -> QuadviewResult<()>;

    /// Leave the rendering view.
    fn close_rendering_context(&mut self) -> QuadviewResult<()>;

    /// Ask the host to invite every participant to open the app.
    fn invite_all_participants(&mut self) -> QuadviewResult<()>;
}

#[cfg(test)]
#[path = "../tests/unit/host/types.rs"]
mod tests;
