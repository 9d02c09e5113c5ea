use crate::config::LayoutOpts;
use crate::foundation::core::Rect;
use crate::foundation::math::clamp_corner_radius;
use crate::geometry::quadrant::QuadrantGeometry;

/// Layout of the branding card inside the reserved quadrant, in quadrant-local device pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrandingGeometry {
    /// Small rounded card holding the logo, anchored at the card's trailing (bottom-right) corner.
    pub logo_card: Rect,
    /// Corner radius of `logo_card`.
    pub logo_radius: f64,
    /// Horizontal center of the topic text.
    pub text_center_x: f64,
    /// Baseline of the first topic line.
    pub text_top_baseline: f64,
    /// Width available to a single line of topic text.
    pub text_max_width: f64,
    /// Font size and line advance of topic text.
    pub line_height: f64,
}

impl BrandingGeometry {
    /// Derive the branding layout from the quadrant's card.
    pub fn from_quadrant(g: &QuadrantGeometry, opts: &LayoutOpts) -> Self {
        let card = g.card_rect_local();
        let long = card.width().max(card.height());
        let rw = long / 2.0;
        let rh = long / 7.0;

        let lx = (card.x1 - rw - g.padding).max(card.x0);
        let ly = (card.y1 - rh - g.padding).max(card.y0);
        let logo_card = Rect::new(lx, ly, lx + rw, ly + rh);

        let word_pad = ((card.height() - rh) / 2.0).floor().max(0.0);
        let text_max_width = (card.width() - word_pad).max(0.0);
        let line_height = text_max_width * opts.text_size_per_mille / 1000.0;

        Self {
            logo_card,
            logo_radius: clamp_corner_radius(g.corner_radius, rw, rh),
            text_center_x: card.center().x,
            text_top_baseline: card.y0 + g.padding + line_height,
            text_max_width,
            line_height,
        }
    }

    /// Lowest baseline that keeps a text line clear of the logo card.
    pub fn text_bottom_limit(&self) -> f64 {
        self.logo_card.y0 - self.line_height * 0.25
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/branding.rs"]
mod tests;
