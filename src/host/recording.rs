//! In-memory [`HostSurface`] that records every call.

use std::collections::BTreeMap;

use crate::compositor::{DrawOperation, ParticipantPlacement};
use crate::foundation::core::{LogicalPx, QuadrantIndex};
use crate::foundation::error::{QuadviewError, QuadviewResult};
use crate::host::{
    HostSurface, ImageHandle, Participant, ParticipantHandle, ParticipantId, RenderingView, Role,
    RunningContext, UserContext,
};

/// One call made against a [`RecordingHost`], in the order it was made.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "call", rename_all = "camelCase")]
pub enum HostCall {
    /// `draw_image`.
    #[serde(rename_all = "camelCase")]
    DrawImage {
        /// Handle returned, `None` when the call was rejected.
        handle: Option<ImageHandle>,
        /// Quadrant the image covers.
        quadrant: QuadrantIndex,
        /// Left edge.
        x: LogicalPx,
        /// Top edge.
        y: LogicalPx,
        /// Buffer width in device pixels.
        width: u32,
        /// Buffer height in device pixels.
        height: u32,
        /// Stacking order.
        z_index: u32,
    },
    /// `clear_image`.
    ClearImage {
        /// Handle cleared.
        handle: ImageHandle,
    },
    /// `draw_participant`.
    #[serde(rename_all = "camelCase")]
    DrawParticipant {
        /// Handle returned, `None` when the call was rejected.
        handle: Option<ParticipantHandle>,
        /// Placement requested.
        placement: ParticipantPlacement,
    },
    /// `clear_participant`.
    ClearParticipant {
        /// Handle cleared.
        handle: ParticipantHandle,
    },
    /// `run_rendering_context`.
    RunRenderingContext {
        /// View requested.
        view: RenderingView,
    },
    /// `close_rendering_context`.
    CloseRenderingContext,
    /// `invite_all_participants`.
    InviteAllParticipants,
}

/// A fake host surface for tests and dry runs.
///
/// Handles are handed out from one monotonically increasing counter. Clearing a handle that is
/// not live is rejected, so leaks and double clears show up as errors.
#[derive(Debug)]
pub struct RecordingHost {
    user: UserContext,
    context: RunningContext,
    participants: Vec<Participant>,
    calls: Vec<HostCall>,
    images: BTreeMap<ImageHandle, DrawOperation>,
    placements: BTreeMap<ParticipantHandle, ParticipantPlacement>,
    next_handle: u64,
    fail_draws: u32,
    fail_clears: u32,
}

impl Default for RecordingHost {
    fn default() -> Self {
        let user = Participant::new("host-1", Role::Host, "Host");
        Self {
            participants: vec![user.clone()],
            user,
            context: RunningContext::InMeeting,
            calls: Vec::new(),
            images: BTreeMap::new(),
            placements: BTreeMap::new(),
            next_handle: 1,
            fail_draws: 0,
            fail_clears: 0,
        }
    }
}

impl RecordingHost {
    /// A host whose local user is the meeting host, running in a meeting.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the local user.
    pub fn with_user(mut self, user: UserContext) -> Self {
        self.user = user;
        self
    }

    /// Replace the running context.
    pub fn with_running_context(mut self, context: RunningContext) -> Self {
        self.context = context;
        self
    }

    /// Replace the meeting roster.
    pub fn with_participants(mut self, participants: Vec<Participant>) -> Self {
        self.participants = participants;
        self
    }

    /// Change the running context later on.
    pub fn set_running_context(&mut self, context: RunningContext) {
        self.context = context;
    }

    /// Reject the next `n` draw calls (images and participants alike).
    pub fn fail_next_draws(&mut self, n: u32) {
        self.fail_draws = n;
    }

    /// Reject the next `n` clear calls. A rejected clear leaves its handle live.
    pub fn fail_next_clears(&mut self, n: u32) {
        self.fail_clears = n;
    }

    /// Calls made so far.
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Forget the call log; live handles are kept.
    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    /// Images currently on screen.
    pub fn live_images(&self) -> &BTreeMap<ImageHandle, DrawOperation> {
        &self.images
    }

    /// Participant videos currently on screen.
    pub fn live_participants(&self) -> &BTreeMap<ParticipantHandle, ParticipantPlacement> {
        &self.placements
    }

    /// Live placement showing `id`, if any.
    pub fn placement_of(&self, id: &ParticipantId) -> Option<&ParticipantPlacement> {
        self.placements.values().find(|p| &p.participant_id == id)
    }

    fn next(&mut self) -> u64 {
        let h = self.next_handle;
        self.next_handle += 1;
        h
    }

    fn take_failure(&mut self) -> bool {
        take_one(&mut self.fail_draws)
    }

    fn take_clear_failure(&mut self) -> bool {
        take_one(&mut self.fail_clears)
    }
}

fn take_one(counter: &mut u32) -> bool {
    if *counter == 0 {
        return false;
    }
    *counter -= 1;
    true
}

impl HostSurface for RecordingHost {
    fn draw_image(&mut self, op: &DrawOperation) -> QuadviewResult<ImageHandle> {
        let handle = (!self.take_failure()).then(|| ImageHandle(self.next()));
        self.calls.push(HostCall::DrawImage {
            handle,
            quadrant: op.quadrant,
            x: op.x,
            y: op.y,
            width: op.pixels.width,
            height: op.pixels.height,
            z_index: op.z_index,
        });
        let handle = handle.ok_or_else(|| {
            QuadviewError::host_call(format!("drawImage rejected for quadrant {}", op.quadrant))
        })?;
        self.images.insert(handle, op.clone());
        Ok(handle)
    }

    fn clear_image(&mut self, handle: ImageHandle) -> QuadviewResult<()> {
        self.calls.push(HostCall::ClearImage { handle });
        if self.take_clear_failure() {
            return Err(QuadviewError::host_call(format!(
                "clearImage rejected for handle {}",
                handle.0
            )));
        }
        self.images
            .remove(&handle)
            .map(|_| ())
            .ok_or_else(|| QuadviewError::host_call(format!("clearImage: unknown handle {}", handle.0)))
    }

    fn draw_participant(
        &mut self,
        placement: &ParticipantPlacement,
    ) -> QuadviewResult<ParticipantHandle> {
        let handle = (!self.take_failure()).then(|| ParticipantHandle(self.next()));
        self.calls.push(HostCall::DrawParticipant {
            handle,
            placement: placement.clone(),
        });
        let handle = handle.ok_or_else(|| {
            QuadviewError::host_call(format!(
                "drawParticipant rejected for {}",
                placement.participant_id
            ))
        })?;
        self.placements.insert(handle, placement.clone());
        Ok(handle)
    }

    fn clear_participant(&mut self, handle: ParticipantHandle) -> QuadviewResult<()> {
        self.calls.push(HostCall::ClearParticipant { handle });
        if self.take_clear_failure() {
            return Err(QuadviewError::host_call(format!(
                "clearParticipant rejected for handle {}",
                handle.0
            )));
        }
        self.placements.remove(&handle).map(|_| ()).ok_or_else(|| {
            QuadviewError::host_call(format!("clearParticipant: unknown handle {}", handle.0))
        })
    }

    fn running_context(&mut self) -> QuadviewResult<RunningContext> {
        Ok(self.context.clone())
    }

    fn user_context(&mut self) -> QuadviewResult<UserContext> {
        Ok(self.user.clone())
    }

    fn meeting_participants(&mut self) -> QuadviewResult<Vec<Participant>> {
        Ok(self.participants.clone())
    }

    fn run_rendering_context(&mut self, view: RenderingView) -> QuadviewResult<()> {
        self.calls.push(HostCall::RunRenderingContext { view });
        if view == RenderingView::Immersive {
            self.context = RunningContext::InImmersive;
        }
        Ok(())
    }

    fn close_rendering_context(&mut self) -> QuadviewResult<()> {
        self.calls.push(HostCall::CloseRenderingContext);
        if self.context == RunningContext::InImmersive {
            self.context = RunningContext::InMeeting;
        }
        Ok(())
    }

    fn invite_all_participants(&mut self) -> QuadviewResult<()> {
        self.calls.push(HostCall::InviteAllParticipants);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/recording.rs"]
mod tests;
