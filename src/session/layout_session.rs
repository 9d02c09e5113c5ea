//! The layout session: owns what is on screen and decides how much to redraw.

use std::collections::BTreeSet;
use std::time::Instant;

use crate::assets::store::BrandAssets;
use crate::compositor::Compositor;
use crate::config::LayoutOpts;
use crate::foundation::core::{Color, QuadrantIndex, ViewportMetrics};
use crate::foundation::error::{QuadviewError, QuadviewResult};
use crate::geometry::quadrant::{QuadrantGeometry, all_quadrants, compute};
use crate::host::{HostSurface, RenderingView, Role, RunningContext, UserContext, VideoMedia};
use crate::session::coalesce::ResizeCoalescer;
use crate::session::roster::{ParticipantEvent, Roster};
use crate::session::state::{Cast, CastSlot, LayoutChanges, LayoutState, RedrawPlan};

/// Whether the session may draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Not started, or stopped. Nothing is drawn.
    #[default]
    Idle,
    /// Compositing is permitted.
    Active,
}

/// A batch of field updates applied with a single redraw, e.g. a peer snapshot.
///
/// Absent fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutUpdate {
    /// New cast.
    pub cast: Option<Vec<CastSlot>>,
    /// New background color.
    pub color: Option<Color>,
    /// New topic text.
    pub topic: Option<String>,
}

/// Layout state plus the host surface it is drawn on.
///
/// Every trigger takes `&mut self`, so composite sequences of one session never interleave.
pub struct LayoutSession<H: HostSurface> {
    host: H,
    compositor: Compositor,
    viewport: ViewportMetrics,
    state: SessionState,
    layout: LayoutState,
    roster: Roster,
    user: Option<UserContext>,
    context: Option<RunningContext>,
    video: Option<VideoMedia>,
    resize: ResizeCoalescer,
}

impl<H: HostSurface> LayoutSession<H> {
    /// Create an idle session drawing on `host`.
    pub fn new(
        host: H,
        opts: LayoutOpts,
        assets: &BrandAssets,
        viewport: ViewportMetrics,
    ) -> QuadviewResult<Self> {
        opts.validate()?;
        viewport.validate()?;
        let resize = ResizeCoalescer::new(opts.resize_debounce());
        let compositor = Compositor::new(opts, assets);
        if !compositor.renders_topics() {
            tracing::debug!("no topic font loaded, topic text will not be drawn");
        }
        Ok(Self {
            host,
            resize,
            compositor,
            viewport,
            state: SessionState::Idle,
            layout: LayoutState::default(),
            roster: Roster::default(),
            user: None,
            context: None,
            video: None,
        })
    }

    /// Read the local user, running context and roster from the host.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn init(&mut self) -> QuadviewResult<()> {
        self.user = Some(self.host.user_context()?);
        self.context = Some(self.host.running_context()?);
        self.roster = Roster::from_participants(self.host.meeting_participants()?);
        tracing::debug!(
            members = self.roster.members().len(),
            context = ?self.context,
            "session initialized"
        );
        Ok(())
    }

    /// Enter the immersive view and draw the first full frame.
    ///
    /// The meeting host may start from a meeting context. Anyone may start once the host has
    /// already switched the client into the immersive context. Otherwise this fails with
    /// `PermissionDenied` and the session stays idle.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn start(&mut self) -> QuadviewResult<()> {
        if self.state == SessionState::Active {
            return Ok(());
        }
        let user = self.host.user_context()?;
        let context = self.host.running_context()?;
        let allowed = match context {
            RunningContext::InMeeting => user.role == Role::Host,
            RunningContext::InImmersive => true,
            _ => false,
        };
        self.user = Some(user.clone());
        self.context = Some(context.clone());
        if !allowed {
            tracing::warn!(role = ?user.role, context = ?context, "start refused");
            return Err(QuadviewError::permission_denied(format!(
                "starting the immersive layout needs the host role inside a meeting (role {:?}, context {:?})",
                user.role, context
            )));
        }

        if context == RunningContext::InMeeting {
            self.host.run_rendering_context(RenderingView::Immersive)?;
            self.context = Some(self.host.running_context()?);
        }
        self.state = SessionState::Active;
        tracing::debug!("session active");
        self.redraw_all()
    }

    /// Clear every drawn handle, leave the immersive view, and reset the layout.
    ///
    /// Every clear is attempted even when an earlier one fails; the first failure is returned.
    /// Handles the host refused to clear survive the reset and are retried by the next `stop()`
    /// or `start()`. A resize still waiting for its quiet period is applied to the viewport.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn stop(&mut self) -> QuadviewResult<()> {
        let was_active = self.state == SessionState::Active;
        self.state = SessionState::Idle;
        if let Some(metrics) = self.resize.take_pending() {
            tracing::debug!(?metrics, "applying pending resize before stop");
            self.viewport = metrics;
        }

        let mut first_err = self.clear_all();
        if was_active {
            let context = match self.host.running_context() {
                Ok(c) => Some(c),
                Err(e) => {
                    tracing::warn!(error = %e, "running context unavailable during stop");
                    self.context.clone()
                }
            };
            if context.as_ref().is_some_and(RunningContext::is_meeting)
                && let Err(e) = self.host.close_rendering_context()
            {
                tracing::warn!(error = %e, "closing rendering context failed");
                first_err.get_or_insert(e);
            }
            self.context = context;
        }
        let uncleared = std::mem::take(&mut self.layout);
        self.layout.drawn_images = uncleared.drawn_images;
        self.layout.drawn_participants = uncleared.drawn_participants;
        tracing::debug!(
            uncleared = self.layout.drawn_images.len() + self.layout.drawn_participants.len(),
            "session idle"
        );
        first_err.map_or(Ok(()), Err)
    }

    /// Replace the cast and redraw only the seats whose participant changed.
    #[tracing::instrument(level = "debug", skip_all, fields(slots = slots.len()))]
    pub fn set_cast(&mut self, slots: Vec<CastSlot>) -> QuadviewResult<()> {
        let changes = LayoutChanges {
            cast_changed: self.replace_cast(slots),
            ..LayoutChanges::default()
        };
        self.apply_changes(&changes)
    }

    /// Change the background color of every quadrant.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn set_color(&mut self, color: Color) -> QuadviewResult<()> {
        let changes = LayoutChanges {
            color_changed: self.replace_color(color),
            ..LayoutChanges::default()
        };
        self.apply_changes(&changes)
    }

    /// Change the topic text on the branding card.
    #[tracing::instrument(level = "debug", skip(self, topic))]
    pub fn set_topic(&mut self, topic: impl Into<String>) -> QuadviewResult<()> {
        let changes = LayoutChanges {
            topic_changed: self.replace_topic(topic.into()),
            ..LayoutChanges::default()
        };
        self.apply_changes(&changes)
    }

    /// Apply several fields at once (cast, then color, then topic) with one redraw.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn apply_update(&mut self, update: LayoutUpdate) -> QuadviewResult<LayoutChanges> {
        let mut changes = LayoutChanges::default();
        if let Some(slots) = update.cast {
            changes.cast_changed = self.replace_cast(slots);
        }
        if let Some(color) = update.color {
            changes.color_changed = self.replace_color(color);
        }
        if let Some(topic) = update.topic {
            changes.topic_changed = self.replace_topic(topic);
        }
        self.apply_changes(&changes)?;
        Ok(changes)
    }

    /// Record a viewport resize. The redraw happens in [`LayoutSession::poll_resize`] once the
    /// burst has been quiet for the configured debounce period.
    pub fn on_viewport_resize(
        &mut self,
        metrics: ViewportMetrics,
        now: Instant,
    ) -> QuadviewResult<()> {
        metrics.validate()?;
        self.resize.signal(metrics, now);
        Ok(())
    }

    /// Run the pending resize redraw if it is due at `now`. Returns `true` when one ran.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn poll_resize(&mut self, now: Instant) -> QuadviewResult<bool> {
        let Some(metrics) = self.resize.take_due(now) else {
            return Ok(false);
        };
        tracing::debug!(
            width = metrics.logical_width,
            height = metrics.logical_height,
            dpr = metrics.device_pixel_ratio,
            coalesced = self.resize.coalesced(),
            "viewport resized"
        );
        self.viewport = metrics;
        if self.state == SessionState::Active {
            self.redraw_all()?;
        }
        Ok(true)
    }

    /// When the pending resize becomes due.
    pub fn resize_deadline(&self) -> Option<Instant> {
        self.resize.deadline()
    }

    /// Track roster changes; participants who left are removed from the cast.
    #[tracing::instrument(level = "debug", skip_all, fields(events = events.len()))]
    pub fn on_participant_change(&mut self, events: &[ParticipantEvent]) -> QuadviewResult<()> {
        let mut changes = LayoutChanges::default();
        for id in self.roster.apply(events) {
            if let Some(i) = self.layout.cast.position_of(&id) {
                let q = self.layout.cast.slots()[i].quadrant_index;
                self.layout.cast.vacate(&id);
                changes.cast_changed.insert(q);
            }
        }
        self.apply_changes(&changes)
    }

    /// The meeting is over; same as [`LayoutSession::stop`].
    pub fn on_meeting_ended(&mut self) -> QuadviewResult<()> {
        self.stop()
    }

    /// Remember the local camera size.
    pub fn on_my_media_change(&mut self, video: VideoMedia) {
        tracing::debug!(width = video.width, height = video.height, "local video changed");
        self.video = Some(video);
    }

    /// Ask the host to invite everyone to the app.
    pub fn invite_all(&mut self) -> QuadviewResult<()> {
        self.host.invite_all_participants()
    }

    /// Cast built from the roster: the host first, then others in join order.
    pub fn default_cast(&self) -> Vec<CastSlot> {
        self.roster.default_cast(Cast::CAPACITY)
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Return `true` while drawing is permitted.
    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Cast, color, topic and drawn handles.
    pub fn layout(&self) -> &LayoutState {
        &self.layout
    }

    /// Viewport the current frame was drawn for.
    pub fn viewport(&self) -> ViewportMetrics {
        self.viewport
    }

    /// Options in use.
    pub fn opts(&self) -> &LayoutOpts {
        self.compositor.opts()
    }

    /// Meeting roster.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Local user, once known.
    pub fn user(&self) -> Option<&UserContext> {
        self.user.as_ref()
    }

    /// Last running context reported by the host.
    pub fn running_context(&self) -> Option<&RunningContext> {
        self.context.as_ref()
    }

    /// Last local video size reported by the host.
    pub fn my_video(&self) -> Option<VideoMedia> {
        self.video
    }

    /// The host surface.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host surface, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Give the host surface back.
    pub fn into_host(self) -> H {
        self.host
    }

    fn replace_cast(&mut self, slots: Vec<CastSlot>) -> BTreeSet<QuadrantIndex> {
        let next = Cast::new(slots, self.opts().cast_quadrants());
        let changed = self.layout.cast.changed_quadrants(&next);
        self.layout.cast = next;
        changed
    }

    fn replace_color(&mut self, color: Color) -> bool {
        let changed = self.layout.color != color;
        self.layout.color = color;
        changed
    }

    fn replace_topic(&mut self, topic: String) -> bool {
        let changed = self.layout.topic != topic;
        self.layout.topic = topic;
        changed
    }

    fn apply_changes(&mut self, changes: &LayoutChanges) -> QuadviewResult<()> {
        if self.state != SessionState::Active {
            return Ok(());
        }
        let plan = changes.plan(self.opts().branding_quadrant);
        tracing::trace!(?plan, "redraw decision");
        match plan {
            RedrawPlan::Nothing => Ok(()),
            RedrawPlan::Full => self.redraw_all(),
            RedrawPlan::Partial {
                images,
                participants,
            } => {
                let geometries = all_quadrants(&self.viewport, self.compositor.opts())?;
                let mut first_err = None;
                for q in images.union(&participants) {
                    let g = &geometries[q.get()];
                    if let Err(e) = self.recomposite(g, images.contains(q), participants.contains(q))
                    {
                        tracing::warn!(quadrant = %q, error = %e, "quadrant redraw failed");
                        first_err.get_or_insert(e);
                    }
                }
                first_err.map_or(Ok(()), Err)
            }
        }
    }

    fn redraw_all(&mut self) -> QuadviewResult<()> {
        let geometries = all_quadrants(&self.viewport, self.compositor.opts())?;
        let mut first_err = self.clear_all();
        for g in &geometries {
            if let Err(e) = self.recomposite(g, true, true) {
                tracing::warn!(quadrant = %g.index, error = %e, "quadrant redraw failed");
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Replace the image and/or participant placement of one quadrant.
    ///
    /// A prior handle is forgotten only after the host accepted its clear.
    fn recomposite(
        &mut self,
        g: &QuadrantGeometry,
        image: bool,
        participant: bool,
    ) -> QuadviewResult<()> {
        let q = g.index;
        let image = image || (participant && !self.layout.drawn_images.contains_key(&q));

        if image {
            if let Some(&h) = self.layout.drawn_images.get(&q) {
                self.host.clear_image(h)?;
                self.layout.drawn_images.remove(&q);
            }
            let composite = self.compositor.compose(
                g,
                None,
                self.layout.topic_text(),
                self.layout.color,
            )?;
            if self.state != SessionState::Active {
                return Ok(());
            }
            if !composite.draw.pixels.is_empty() {
                let h = self.host.draw_image(&composite.draw)?;
                self.layout.drawn_images.insert(q, h);
            }
        }

        if participant {
            if let Some(h) = self.layout.drawn_participants.get(&q).map(|(_, h)| *h) {
                self.host.clear_participant(h)?;
                self.layout.drawn_participants.remove(&q);
            }
            let placement = self
                .layout
                .cast
                .participant_in(q)
                .filter(|_| !g.is_degenerate())
                .and_then(|id| self.compositor.placement(g, id));
            if let Some(p) = placement {
                if self.state != SessionState::Active {
                    return Ok(());
                }
                let h = self.host.draw_participant(&p)?;
                self.layout
                    .drawn_participants
                    .insert(q, (p.participant_id, h));
            }
        }
        Ok(())
    }

    /// Clear every drawn handle and return the first failure.
    ///
    /// A handle whose clear the host rejected stays tracked, so the next redraw or `stop()`
    /// clears it again.
    fn clear_all(&mut self) -> Option<QuadviewError> {
        let mut first_err = None;
        for (q, (id, h)) in std::mem::take(&mut self.layout.drawn_participants) {
            if let Err(e) = self.host.clear_participant(h) {
                tracing::warn!(quadrant = %q, participant = %id, error = %e, "clearParticipant failed");
                first_err.get_or_insert(e);
                self.layout.drawn_participants.insert(q, (id, h));
            }
        }
        for (q, h) in std::mem::take(&mut self.layout.drawn_images) {
            if let Err(e) = self.host.clear_image(h) {
                tracing::warn!(quadrant = %q, error = %e, "clearImage failed");
                first_err.get_or_insert(e);
                self.layout.drawn_images.insert(q, h);
            }
        }
        first_err
    }

    /// Geometry of one quadrant at the current viewport.
    pub fn quadrant_geometry(&self, q: QuadrantIndex) -> QuadviewResult<QuadrantGeometry> {
        compute(&self.viewport, q, self.compositor.opts())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/layout_session.rs"]
mod tests;
