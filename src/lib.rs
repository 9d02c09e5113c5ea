//! Quadview composes a four-quadrant immersive meeting layout.
//!
//! The screen is split into four quadrants. Three show a participant's live video through a
//! rounded hole cut into a colored background; the fourth carries a logo card and the meeting
//! topic. The public API is session-oriented:
//!
//! - Configure [`LayoutOpts`] and load [`BrandAssets`]
//! - Create a [`LayoutSession`] over a [`HostSurface`]
//! - Feed it cast, color, topic, roster and resize events; it issues the minimal draw/clear calls
//! - Keep peers in sync through a [`Relay`] and [`SyncClient`]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assets;
mod foundation;
mod render;
mod text;

/// Layout options.
pub mod config;
/// Per-quadrant raster composition.
pub mod compositor;
/// Quadrant and branding card geometry.
pub mod geometry;
/// Host surface boundary.
pub mod host;
/// Layout session and redraw decisions.
pub mod session;
/// Layout synchronization between peers.
pub mod sync;

pub use crate::assets::decode::PreparedImage;
pub use crate::assets::store::BrandAssets;
pub use crate::foundation::core::{
    BezPath, Color, LogicalPx, Point, QuadrantIndex, Rect, RoundedRect, ViewportMetrics,
};
pub use crate::foundation::error::{QuadviewError, QuadviewResult};

pub use crate::compositor::{
    Compositor, DrawOperation, ParticipantPlacement, PixelBuffer, QuadrantComposite,
};
pub use crate::config::LayoutOpts;
pub use crate::geometry::branding::BrandingGeometry;
pub use crate::geometry::quadrant::{QuadrantGeometry, all_quadrants, quadrant_geometry};
pub use crate::host::recording::{HostCall, RecordingHost};
pub use crate::host::{
    HostSurface, ImageHandle, Participant, ParticipantHandle, ParticipantId, RenderingView, Role,
    RunningContext, UserContext, VideoMedia,
};
pub use crate::session::layout_session::{LayoutSession, LayoutUpdate, SessionState};
pub use crate::session::roster::{ParticipantEvent, ParticipantStatus, Roster};
pub use crate::session::state::{Cast, CastSlot, LayoutChanges, LayoutState, RedrawPlan};
pub use crate::sync::client::SyncClient;
pub use crate::sync::protocol::{ClientMessage, ServerMessage, SnapshotFields};
pub use crate::sync::relay::{Outgoing, PeerId, Relay, RoomSnapshot};
