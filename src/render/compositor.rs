use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::foundation::core::{Affine, Canvas, Rect, Rgba8};
use crate::foundation::error::{LineartError, LineartResult};
use crate::render::frame::FrameRGBA;
use crate::render::scene::FrameScene;
use crate::render::text::TextRenderer;

/// Headless rendering context.
///
/// Owns the CPU raster context, the optional text renderer and per-slot sprite paints. It is
/// created explicitly by the caller and passed to whatever composes frames; there is no
/// process-wide rendering state.
pub struct Compositor {
    canvas: Canvas,
    ctx: Option<vello_cpu::RenderContext>,
    text: Option<TextRenderer>,
    sprite_cache: HashMap<usize, SpritePaint>,
}

#[derive(Clone)]
struct SpritePaint {
    paint: vello_cpu::Image,
    source: Arc<Vec<u8>>,
    w: u32,
    h: u32,
}

impl Compositor {
    /// Create a compositor for frames of `canvas` size.
    ///
    /// Without a [`TextRenderer`], text overlays in scenes are skipped.
    pub fn new(canvas: Canvas, text: Option<TextRenderer>) -> LineartResult<Self> {
        let canvas = Canvas::new(canvas.width, canvas.height)?;
        if text.is_none() {
            tracing::warn!("no font available; text overlays will be omitted");
        }
        Ok(Self {
            canvas,
            ctx: None,
            text,
            sprite_cache: HashMap::new(),
        })
    }

    /// Output canvas size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Whether text overlays are rendered.
    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }

    /// Rasterize `scene` into a fresh frame.
    pub fn compose(&mut self, scene: &FrameScene) -> LineartResult<FrameRGBA> {
        if scene.canvas != self.canvas {
            return Err(LineartError::render(format!(
                "scene canvas {}x{} does not match compositor canvas {}x{}",
                scene.canvas.width, scene.canvas.height, self.canvas.width, self.canvas.height
            )));
        }
        let width = to_u16(self.canvas.width)?;
        let height = to_u16(self.canvas.height)?;

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let drawn = self.draw_scene(scene, &mut ctx);
        let out = drawn.map(|()| {
            let mut pixmap = vello_cpu::Pixmap::new(width, height);
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            FrameRGBA {
                width: self.canvas.width,
                height: self.canvas.height,
                data: pixmap.data_as_u8_slice().to_vec(),
            }
        });
        self.ctx = Some(ctx);
        out
    }

    fn draw_scene(
        &mut self,
        scene: &FrameScene,
        ctx: &mut vello_cpu::RenderContext,
    ) -> LineartResult<()> {
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color_to_cpu(scene.background));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.canvas.width),
            f64::from(self.canvas.height),
        ));

        for sprite in &scene.sprites {
            let p = self.sprite_paint_for(sprite.slot, &sprite.image)?;
            let (x, y) = sprite.origin;
            ctx.set_transform(affine_to_cpu(Affine::translate((x as f64, y as f64))));
            ctx.set_paint(p.paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(p.w),
                f64::from(p.h),
            ));
        }

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        for rule in &scene.rules {
            ctx.set_paint(color_to_cpu(rule.color));
            ctx.fill_rect(&rect_to_cpu(rule.rect));
        }

        let Some(text) = self.text.as_mut() else {
            return Ok(());
        };
        for label in &scene.texts {
            let layout = text.layout(&label.text, label.color);
            ctx.set_transform(affine_to_cpu(Affine::translate((
                label.origin.x,
                label.origin.y,
            ))));
            for line in layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));
                    // Positioned glyphs carry the run offset, pen advance and baseline.
                    let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(text.font())
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
        }
        Ok(())
    }

    fn sprite_paint_for(&mut self, slot: usize, image: &PreparedImage) -> LineartResult<SpritePaint> {
        if let Some(p) = self.sprite_cache.get(&slot)
            && Arc::ptr_eq(&p.source, &image.rgba8_premul)
        {
            return Ok(p.clone());
        }
        let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        let out = SpritePaint {
            paint,
            source: Arc::clone(&image.rgba8_premul),
            w: image.width,
            h: image.height,
        };
        self.sprite_cache.insert(slot, out.clone());
        Ok(out)
    }
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("canvas", &self.canvas)
            .field("text", &self.text)
            .field("cached_sprites", &self.sprite_cache.len())
            .finish_non_exhaustive()
    }
}

fn to_u16(v: u32) -> LineartResult<u16> {
    v.try_into()
        .map_err(|_| LineartError::invalid_config("canvas edge exceeds u16"))
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> LineartResult<vello_cpu::Pixmap> {
    let w = to_u16(width)?;
    let h = to_u16(height)?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(LineartError::render("sprite byte length mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
