use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::assets::store::BrandAssets;
use crate::foundation::core::{Color, Rect};
use crate::foundation::error::{QuadviewError, QuadviewResult};
use crate::geometry::branding::BrandingGeometry;
use crate::geometry::path::{rounded_rect_path, to_cpu_path};
use crate::geometry::quadrant::QuadrantGeometry;
use crate::render::composite::{dest_out_in_place, fill_in_place, over_in_place};
use crate::text::engine::TextLayoutEngine;

/// Premultiplied RGBA8 pixels of one quadrant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width in device pixels.
    pub width: u32,
    /// Height in device pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major, premultiplied alpha.
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Return `true` when the buffer holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }
}

pub(crate) struct BrandingJob<'a> {
    pub(crate) geometry: BrandingGeometry,
    pub(crate) topic: Option<&'a str>,
    pub(crate) text_color: Color,
}

struct LogoPaint {
    paint: vello_cpu::Image,
    w: f64,
    h: f64,
}

/// CPU rasterizer for quadrant surfaces, powered by `vello_cpu`.
pub(crate) struct QuadrantRaster {
    ctx: Option<vello_cpu::RenderContext>,
    text: Option<TextLayoutEngine>,
    logo: Option<LogoPaint>,
}

impl QuadrantRaster {
    pub(crate) fn new(assets: &BrandAssets) -> Self {
        let text = assets
            .font()
            .and_then(|bytes| match TextLayoutEngine::new(bytes) {
                Ok(engine) => Some(engine),
                Err(e) => {
                    tracing::warn!(error = %e, "topic font rejected, topics will not be drawn");
                    None
                }
            });
        let logo = assets.logo().and_then(|img| match logo_paint(img) {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::warn!(error = %e, "logo rejected, continuing without it");
                None
            }
        });
        Self {
            ctx: None,
            text,
            logo,
        }
    }

    pub(crate) fn has_text(&self) -> bool {
        self.text.is_some()
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> QuadviewResult<R>,
    ) -> QuadviewResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    /// Background fill, rounded hole, then the optional branding overlay.
    pub(crate) fn rasterize(
        &mut self,
        g: &QuadrantGeometry,
        color: Color,
        branding: Option<BrandingJob<'_>>,
    ) -> QuadviewResult<PixelBuffer> {
        let (width, height) = g.raster_size();
        if width == 0 || height == 0 {
            return Ok(PixelBuffer {
                width,
                height,
                data: Vec::new(),
            });
        }
        let w16: u16 = width
            .try_into()
            .map_err(|_| QuadviewError::invalid_argument("quadrant width exceeds u16"))?;
        let h16: u16 = height
            .try_into()
            .map_err(|_| QuadviewError::invalid_argument("quadrant height exceeds u16"))?;

        let mut data = vec![0u8; (width as usize) * (height as usize) * 4];
        fill_in_place(&mut data, color.to_premul());

        if !g.is_degenerate() {
            let hole = rounded_rect_path(g.card_rect_local(), g.corner_radius);
            let mut mask = vello_cpu::Pixmap::new(w16, h16);
            self.with_ctx_mut(w16, h16, |_, ctx| {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
                ctx.fill_path(&to_cpu_path(&hole));
                ctx.flush();
                ctx.render_to_pixmap(&mut mask);
                Ok(())
            })?;
            dest_out_in_place(&mut data, mask.data_as_u8_slice())?;
        }

        if let Some(job) = branding {
            let mut overlay = vello_cpu::Pixmap::new(w16, h16);
            self.with_ctx_mut(w16, h16, |this, ctx| {
                this.draw_branding(ctx, g, color, &job)?;
                ctx.flush();
                ctx.render_to_pixmap(&mut overlay);
                Ok(())
            })?;
            over_in_place(&mut data, overlay.data_as_u8_slice())?;
        }

        Ok(PixelBuffer {
            width,
            height,
            data,
        })
    }

    fn draw_branding(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        g: &QuadrantGeometry,
        color: Color,
        job: &BrandingJob<'_>,
    ) -> QuadviewResult<()> {
        let b = &job.geometry;
        if let Some(topic) = job.topic.filter(|t| !t.trim().is_empty()) {
            self.draw_topic(ctx, b, topic, job.text_color);
        }

        if b.logo_card.area() <= 0.0 || g.is_degenerate() {
            return Ok(());
        }
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color.to_peniko());
        ctx.fill_path(&to_cpu_path(&rounded_rect_path(b.logo_card, b.logo_radius)));

        if let Some(logo) = &self.logo {
            let fit = fit_inside(logo.w, logo.h, b.logo_card);
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_transform(
                vello_cpu::kurbo::Affine::translate((fit.x0, fit.y0))
                    * vello_cpu::kurbo::Affine::scale(fit.width() / logo.w),
            );
            ctx.set_paint(logo.paint.clone());
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, logo.w, logo.h));
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        }
        Ok(())
    }

    fn draw_topic(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        b: &BrandingGeometry,
        topic: &str,
        text_color: Color,
    ) {
        let Some(engine) = self.text.as_mut() else {
            tracing::debug!("no topic font loaded, skipping topic text");
            return;
        };
        if b.line_height <= 0.0 {
            return;
        }
        let size = b.line_height as f32;
        let lines = match engine.wrap(topic, size, b.text_max_width as f32) {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!(error = %e, "topic layout failed, skipping topic text");
                return;
            }
        };
        for (i, line) in lines.iter().enumerate() {
            let baseline = b.text_top_baseline + b.line_height * i as f64;
            if baseline > b.text_bottom_limit() {
                break;
            }
            if let Err(e) = engine.draw_line_centered(
                ctx,
                line,
                size,
                text_color.into(),
                b.text_center_x,
                baseline,
            ) {
                tracing::warn!(error = %e, "topic line failed to draw");
            }
        }
    }
}

/// Largest rect with aspect `w:h` centered inside `target`.
fn fit_inside(w: f64, h: f64, target: Rect) -> Rect {
    let ratio = (target.width() / w).min(target.height() / h);
    let fw = w * ratio;
    let fh = h * ratio;
    let x = target.x0 + (target.width() - fw) / 2.0;
    let y = target.y0 + (target.height() - fh) / 2.0;
    Rect::new(x, y, x + fw, y + fh)
}

fn logo_paint(img: &PreparedImage) -> QuadviewResult<LogoPaint> {
    let pixmap = pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)?;
    Ok(LogoPaint {
        paint: vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        },
        w: f64::from(img.width),
        h: f64::from(img.height),
    })
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> QuadviewResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| QuadviewError::asset_load("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| QuadviewError::asset_load("image height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(QuadviewError::asset_load("image byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
