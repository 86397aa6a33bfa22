use std::path::{Path, PathBuf};

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{LineartError, LineartResult};
use crate::render::compositor::Compositor;
use crate::render::frame::FrameRGBA;
use crate::render::scene::FrameScene;
use crate::render::text::TextRenderer;

const MARGIN_PX: f64 = 10.0;
/// Font pixel size at scale 1.
const BASE_FONT_PX: f64 = 30.0;
/// Line advance at scale 1, before `line_space`.
const BASE_LINE_STEP_PX: f64 = 40.0;

/// A text card: multiline text drawn left-aligned on a solid canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct TextImageOpts {
    /// Text; each line is drawn on its own row.
    pub text: String,
    /// Font file (TTF/OTF).
    pub font: PathBuf,
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Size multiplier for glyphs and line advance.
    pub font_scale: f64,
    /// Extra pixels between lines. May be negative.
    pub line_space: i32,
    /// Text color.
    pub color: Rgba8,
    /// Canvas color.
    pub background: Rgba8,
}

impl TextImageOpts {
    /// 500x300 white card with black text at scale 1.
    pub fn new(text: impl Into<String>, font: impl Into<PathBuf>) -> Self {
        Self {
            text: text.into(),
            font: font.into(),
            width: 500,
            height: 300,
            font_scale: 1.0,
            line_space: 0,
            color: Rgba8::BLACK,
            background: Rgba8::WHITE,
        }
    }

    /// Vertical distance between consecutive lines.
    pub fn line_step(&self) -> f64 {
        (self.font_scale * BASE_LINE_STEP_PX).trunc() + f64::from(self.line_space)
    }

    /// Glyph size in pixels.
    pub fn font_size_px(&self) -> f32 {
        (self.font_scale * BASE_FONT_PX) as f32
    }

    /// Describe the card without rasterizing it.
    pub fn scene(&self) -> LineartResult<FrameScene> {
        if !self.font_scale.is_finite() || self.font_scale <= 0.0 {
            return Err(LineartError::invalid_config(format!(
                "font scale must be finite and > 0, got {}",
                self.font_scale
            )));
        }
        let canvas = Canvas::new(self.width, self.height)?;
        let mut scene = FrameScene::new(canvas, self.background);
        let step = self.line_step();
        for (i, line) in self.text.lines().enumerate() {
            scene.text(line, MARGIN_PX, MARGIN_PX + i as f64 * step, self.color);
        }
        Ok(scene)
    }
}

/// Rasterize a text card.
pub fn render_text_image(opts: &TextImageOpts) -> LineartResult<FrameRGBA> {
    let scene = opts.scene()?;
    let text = TextRenderer::from_path(&opts.font, opts.font_size_px())?;
    let mut compositor = Compositor::new(scene.canvas, Some(text))?;
    compositor.compose(&scene)
}

/// Rasterize a text card and write it as a PNG.
pub fn save_text_image(opts: &TextImageOpts, path: &Path) -> LineartResult<()> {
    let frame = render_text_image(opts)?;
    frame.save_png(path, opts.background.to_array())?;
    tracing::info!(out = %path.display(), lines = opts.text.lines().count(), "wrote text image");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/compose/text_image.rs"]
mod tests;
