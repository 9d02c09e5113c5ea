//! Quadrant and card rectangles derived from viewport metrics.
//!
//! All values are device pixels. Conversion to the host's logical pixel space happens only at the
//! boundary (see [`QuadrantGeometry::card_position_logical`]).

use crate::config::LayoutOpts;
use crate::foundation::core::{LogicalPx, QuadrantIndex, Rect, ViewportMetrics};
use crate::foundation::error::QuadviewResult;
use crate::foundation::math::clamp_corner_radius;

/// Placement of one quadrant and its rounded video card.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuadrantGeometry {
    /// Which quadrant this geometry describes.
    pub index: QuadrantIndex,
    /// Quadrant origin, absolute.
    pub origin_x: f64,
    /// Quadrant origin, absolute.
    pub origin_y: f64,
    /// Half the viewport width.
    pub quadrant_width: f64,
    /// Half the viewport height.
    pub quadrant_height: f64,
    /// Card width after shrinking to fit.
    pub card_width: f64,
    /// `card_width` scaled by the configured aspect.
    pub card_height: f64,
    /// Card origin, absolute.
    pub card_origin_x: f64,
    /// Card origin, absolute.
    pub card_origin_y: f64,
    /// Corner radius, never more than half the card's shorter side.
    pub corner_radius: f64,
    /// Tight padding against the outer screen edges.
    pub padding: f64,
    /// Copied from the viewport for logical-pixel conversion.
    pub device_pixel_ratio: f64,
}

/// Compute geometry for a raw quadrant index.
///
/// Indices outside `[0, 3]` fail with `InvalidArgument`.
pub fn quadrant_geometry(
    metrics: &ViewportMetrics,
    idx: usize,
    opts: &LayoutOpts,
) -> QuadviewResult<QuadrantGeometry> {
    let index = QuadrantIndex::try_new(idx)?;
    compute(metrics, index, opts)
}

/// Compute geometry for all four quadrants in index order.
pub fn all_quadrants(
    metrics: &ViewportMetrics,
    opts: &LayoutOpts,
) -> QuadviewResult<[QuadrantGeometry; 4]> {
    Ok([
        compute(metrics, QuadrantIndex::ALL[0], opts)?,
        compute(metrics, QuadrantIndex::ALL[1], opts)?,
        compute(metrics, QuadrantIndex::ALL[2], opts)?,
        compute(metrics, QuadrantIndex::ALL[3], opts)?,
    ])
}

/// Compute geometry for `index`.
pub fn compute(
    metrics: &ViewportMetrics,
    index: QuadrantIndex,
    opts: &LayoutOpts,
) -> QuadviewResult<QuadrantGeometry> {
    metrics.validate()?;

    let qw = metrics.device_width() / 2.0;
    let qh = metrics.device_height() / 2.0;
    let origin_x = if index.is_right() { qw } else { 0.0 };
    let origin_y = if index.is_bottom() { qh } else { 0.0 };

    let mut g = QuadrantGeometry {
        index,
        origin_x,
        origin_y,
        quadrant_width: qw,
        quadrant_height: qh,
        card_width: 0.0,
        card_height: 0.0,
        card_origin_x: origin_x,
        card_origin_y: origin_y,
        corner_radius: 0.0,
        padding: 0.0,
        device_pixel_ratio: metrics.device_pixel_ratio,
    };
    if metrics.is_degenerate() {
        return Ok(g);
    }

    let padding = (qw.max(qh) / opts.padding_divisor).min(qw / 2.0).min(qh / 2.0);
    let (w, h) = fit_card(qw, qh, padding, opts);

    let loose_x = (qw - (w + padding)).max(padding * 2.0).floor();
    let loose_y = (qh - (h + padding)).max(padding * 2.0).floor();
    let off_x = if index.is_right() { loose_x } else { padding };
    let off_y = if index.is_bottom() { loose_y } else { padding };

    g.card_width = w;
    g.card_height = h;
    g.card_origin_x = origin_x + off_x.min(qw - w).max(0.0);
    g.card_origin_y = origin_y + off_y.min(qh - h).max(0.0);
    g.corner_radius = clamp_corner_radius(w.min(h) * opts.corner_radius_ratio, w, h);
    g.padding = padding;
    Ok(g)
}

/// Largest card (in unit steps of the base width) whose height plus padding fits the quadrant.
fn fit_card(qw: f64, qh: f64, padding: f64, opts: &LayoutOpts) -> (f64, f64) {
    let ratio = opts.card_width_ratio;
    let inv = opts.aspect_inverse();
    let card = |base: f64| (base * ratio, base * ratio * inv);
    let fits = |h: f64| h + padding * 2.0 <= qh;

    let mut base = qw;
    let (w, h) = card(base);
    if fits(h) {
        return (w, h);
    }

    // Jump straight to the first unit decrement that can fit, then settle float rounding
    // with single steps.
    let max_base = (qh - padding * 2.0) / (ratio * inv);
    base -= (qw - max_base).ceil().max(1.0);
    loop {
        if base <= 0.0 {
            return (0.0, 0.0);
        }
        let (w, h) = card(base);
        if fits(h) {
            return (w, h);
        }
        base -= 1.0;
    }
}

impl QuadrantGeometry {
    /// The quadrant's rectangle, absolute.
    pub fn quadrant_rect(&self) -> Rect {
        Rect::new(
            self.origin_x,
            self.origin_y,
            self.origin_x + self.quadrant_width,
            self.origin_y + self.quadrant_height,
        )
    }

    /// The card's rectangle, absolute.
    pub fn card_rect(&self) -> Rect {
        Rect::new(
            self.card_origin_x,
            self.card_origin_y,
            self.card_origin_x + self.card_width,
            self.card_origin_y + self.card_height,
        )
    }

    /// The card's rectangle relative to the quadrant origin (raster space).
    pub fn card_rect_local(&self) -> Rect {
        let x = self.card_origin_x - self.origin_x;
        let y = self.card_origin_y - self.origin_y;
        Rect::new(x, y, x + self.card_width, y + self.card_height)
    }

    /// Raster size of the quadrant surface in whole device pixels.
    pub fn raster_size(&self) -> (u32, u32) {
        (
            self.quadrant_width.round().max(0.0) as u32,
            self.quadrant_height.round().max(0.0) as u32,
        )
    }

    /// Return `true` when the card has no area.
    pub fn is_degenerate(&self) -> bool {
        self.card_width <= 0.0 || self.card_height <= 0.0
    }

    /// Quadrant origin in host logical pixels.
    pub fn quadrant_position_logical(&self) -> (LogicalPx, LogicalPx) {
        (self.to_logical(self.origin_x), self.to_logical(self.origin_y))
    }

    /// Card origin in host logical pixels.
    pub fn card_position_logical(&self) -> (LogicalPx, LogicalPx) {
        (
            self.to_logical(self.card_origin_x),
            self.to_logical(self.card_origin_y),
        )
    }

    /// Card size in host logical pixels.
    pub fn card_size_logical(&self) -> (LogicalPx, LogicalPx) {
        (
            self.to_logical(self.card_width),
            self.to_logical(self.card_height),
        )
    }

    fn to_logical(&self, v: f64) -> LogicalPx {
        LogicalPx::from_device(v, self.device_pixel_ratio)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/quadrant.rs"]
mod tests;
