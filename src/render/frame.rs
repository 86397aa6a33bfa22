use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Canvas;
use crate::foundation::error::{LineartError, LineartResult};
use crate::foundation::math::flatten_premul_over_bg;

/// A rendered frame as premultiplied RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// A frame filled with one opaque straight-alpha color.
    pub fn filled(canvas: Canvas, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(canvas.rgba_len());
        for _ in 0..(canvas.width as usize * canvas.height as usize) {
            data.extend_from_slice(&rgba);
        }
        Self {
            width: canvas.width,
            height: canvas.height,
            data,
        }
    }

    /// Canvas size of this frame.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Premultiplied pixel at `(x, y)`, or `None` when out of bounds.
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

    /// Copy `src` into this frame with its top-left corner at `(left, top)`, clipping at edges.
    pub fn blit(&mut self, src: &FrameRGBA, left: u32, top: u32) {
        if left >= self.width || top >= self.height {
            return;
        }
        let cols = src.width.min(self.width - left) as usize;
        let rows = src.height.min(self.height - top) as usize;
        let dst_stride = self.width as usize * 4;
        let src_stride = src.width as usize * 4;
        for row in 0..rows {
            let d = (top as usize + row) * dst_stride + left as usize * 4;
            let s = row * src_stride;
            self.data[d..d + cols * 4].copy_from_slice(&src.data[s..s + cols * 4]);
        }
    }

    /// Write the frame as a PNG, flattening alpha over `bg_rgba`.
    pub fn save_png(&self, path: &Path, bg_rgba: [u8; 4]) -> LineartResult<()> {
        let mut flat = vec![0u8; self.data.len()];
        flatten_premul_over_bg(&mut flat, &self.data, bg_rgba);
        let img = image::RgbaImage::from_raw(self.width, self.height, flat)
            .ok_or_else(|| LineartError::render("frame buffer does not match its dimensions"))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output directory '{}'", parent.display()))?;
        }
        img.save(path)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
