use crate::foundation::core::Color;
use crate::foundation::error::{QuadviewError, QuadviewResult};
use crate::text::wrap::wrap_words;

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Color> for TextBrushRgba8 {
    fn from(c: Color) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Parley layout contexts bound to a single font.
///
/// The font is registered once; every layout uses its family.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl TextLayoutEngine {
    /// Register `font_bytes` and prepare fresh Parley contexts.
    pub(crate) fn new(font_bytes: &[u8]) -> QuadviewResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            QuadviewError::asset_load("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| QuadviewError::asset_load("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font: vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(font_bytes.to_vec()),
                0,
            ),
        })
    }

    /// Shape a single unbroken line.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> QuadviewResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(QuadviewError::invalid_argument(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Rendered advance width of `text` on one line.
    pub(crate) fn measure(&mut self, text: &str, size_px: f32) -> QuadviewResult<f32> {
        Ok(self
            .layout_line(text, size_px, TextBrushRgba8::default())?
            .width())
    }

    /// Wrap `text` into lines no wider than `max_width` using real glyph advances.
    pub(crate) fn wrap(
        &mut self,
        text: &str,
        size_px: f32,
        max_width: f32,
    ) -> QuadviewResult<Vec<String>> {
        let mut failure = None;
        let lines = wrap_words(text, max_width, |candidate| {
            match self.measure(candidate, size_px) {
                Ok(w) => w,
                Err(e) => {
                    failure.get_or_insert(e);
                    f32::INFINITY
                }
            }
        });
        match failure {
            Some(e) => Err(e),
            None => Ok(lines),
        }
    }

    /// Fill one line of glyphs horizontally centered on `center_x` with its baseline at `baseline`.
    pub(crate) fn draw_line_centered(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
        center_x: f64,
        baseline: f64,
    ) -> QuadviewResult<()> {
        let layout = self.layout_line(text, size_px, brush)?;
        let first_baseline = layout
            .lines()
            .next()
            .map(|l| f64::from(l.metrics().baseline))
            .unwrap_or(0.0);
        let dx = center_x - f64::from(layout.width()) / 2.0;
        let dy = baseline - first_baseline;

        ctx.set_transform(vello_cpu::kurbo::Affine::translate((dx, dy)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/engine.rs"]
mod tests;
