//! Per-quadrant composition: raster surface plus host placement descriptors.

use crate::assets::store::BrandAssets;
use crate::config::LayoutOpts;
use crate::foundation::core::{Color, LogicalPx, QuadrantIndex};
use crate::foundation::error::QuadviewResult;
use crate::geometry::branding::BrandingGeometry;
use crate::geometry::quadrant::QuadrantGeometry;
use crate::host::ParticipantId;
use crate::render::raster::{BrandingJob, QuadrantRaster};

pub use crate::render::raster::PixelBuffer;

/// A quadrant image ready for `HostSurface::draw_image`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawOperation {
    /// Quadrant the image covers.
    pub quadrant: QuadrantIndex,
    /// Premultiplied pixels in device space.
    pub pixels: PixelBuffer,
    /// Left edge in logical pixels.
    pub x: LogicalPx,
    /// Top edge in logical pixels.
    pub y: LogicalPx,
    /// Stacking order; one above the quadrant's participant video.
    pub z_index: u32,
}

/// Live video placement aligned with a quadrant's card.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantPlacement {
    /// Whose video to show.
    pub participant_id: ParticipantId,
    /// Left edge in logical pixels.
    pub x: LogicalPx,
    /// Top edge in logical pixels.
    pub y: LogicalPx,
    /// Width in logical pixels.
    pub width: LogicalPx,
    /// Height in logical pixels.
    pub height: LogicalPx,
    /// Stacking order; below the quadrant image so it shows through the hole.
    pub z_index: u32,
}

/// Output of composing one quadrant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuadrantComposite {
    /// The quadrant image.
    pub draw: DrawOperation,
    /// Present when a participant is assigned to a non-branding quadrant.
    pub participant: Option<ParticipantPlacement>,
}

/// Draws quadrant surfaces for a fixed set of options and brand assets.
pub struct Compositor {
    opts: LayoutOpts,
    raster: QuadrantRaster,
}

impl Compositor {
    /// Build a compositor. Asset problems are already recorded in `assets`.
    pub fn new(opts: LayoutOpts, assets: &BrandAssets) -> Self {
        Self {
            raster: QuadrantRaster::new(assets),
            opts,
        }
    }

    /// Options this compositor was built with.
    pub fn opts(&self) -> &LayoutOpts {
        &self.opts
    }

    /// Return `true` when a topic font is loaded and topic text will be drawn.
    pub fn renders_topics(&self) -> bool {
        self.raster.has_text()
    }

    /// Compose one quadrant.
    ///
    /// The branding quadrant gets the logo card and topic text and never a participant. Identical
    /// inputs produce identical pixels.
    #[tracing::instrument(level = "trace", skip(self, g), fields(quadrant = %g.index))]
    pub fn compose(
        &mut self,
        g: &QuadrantGeometry,
        participant: Option<&ParticipantId>,
        topic: Option<&str>,
        color: Color,
    ) -> QuadviewResult<QuadrantComposite> {
        let is_branding = g.index == self.opts.branding_quadrant;
        let branding = is_branding.then(|| BrandingJob {
            geometry: BrandingGeometry::from_quadrant(g, &self.opts),
            topic,
            text_color: self.opts.text_color,
        });
        let pixels = self.raster.rasterize(g, color, branding)?;

        let (x, y) = g.quadrant_position_logical();
        let draw = DrawOperation {
            quadrant: g.index,
            pixels,
            x,
            y,
            z_index: g.index.get() as u32 + 1,
        };

        let participant = participant.and_then(|id| self.placement(g, id));

        Ok(QuadrantComposite { draw, participant })
    }

    /// Placement of `id`'s video over the card of `g`, without rasterizing anything.
    ///
    /// Returns `None` for the branding quadrant.
    pub fn placement(
        &self,
        g: &QuadrantGeometry,
        id: &ParticipantId,
    ) -> Option<ParticipantPlacement> {
        if g.index == self.opts.branding_quadrant {
            return None;
        }
        let (x, y) = g.card_position_logical();
        let (width, height) = g.card_size_logical();
        Some(ParticipantPlacement {
            participant_id: id.clone(),
            x,
            y,
            width,
            height,
            z_index: g.index.get() as u32,
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/compositor/compose.rs"]
mod tests;
