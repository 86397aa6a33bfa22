use std::path::Path;
use std::sync::Arc;

use image::imageops::FilterType;

use crate::foundation::core::Canvas;
use crate::foundation::error::{LineartError, LineartResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Decoded raster ready for compositing (premultiplied RGBA8).
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes, tightly packed, row-major.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Height that keeps the aspect ratio when an image of `width`x`height` is scaled to
/// `target_width` pixels wide.
pub fn normalized_height(target_width: u32, width: u32, height: u32) -> u32 {
    let h = (f64::from(target_width) * f64::from(height) / f64::from(width)).round();
    (h as u32).max(1)
}

/// Decode an encoded image held in memory into straight-alpha RGBA8.
pub(crate) fn decode_rgba8(bytes: &[u8], label: &str) -> LineartResult<image::RgbaImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| LineartError::resource(format!("failed to decode image '{label}': {e}")))?;
    let rgba = dyn_img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(LineartError::resource(format!("image '{label}' is empty")));
    }
    Ok(rgba)
}

/// Read and decode an image file into straight-alpha RGBA8.
pub fn read_rgba8(path: &Path) -> LineartResult<image::RgbaImage> {
    let bytes = std::fs::read(path).map_err(|e| {
        LineartError::resource(format!("failed to read image '{}': {e}", path.display()))
    })?;
    decode_rgba8(&bytes, &path.display().to_string())
}

/// Read an image file and rescale it to `target_width` pixels wide, preserving aspect ratio.
///
/// Both edges of the result must fit a raster (`Canvas::MAX_EDGE`); anything larger is a
/// configuration error raised before any pixels are resized.
pub fn load_normalized(path: &Path, target_width: u32) -> LineartResult<PreparedImage> {
    if target_width == 0 || target_width > Canvas::MAX_EDGE {
        return Err(LineartError::invalid_config(format!(
            "target width must be in 1..={}, got {target_width}",
            Canvas::MAX_EDGE
        )));
    }
    let rgba = read_rgba8(path)?;
    let (w, h) = rgba.dimensions();
    let target_height = normalized_height(target_width, w, h);
    if target_height > Canvas::MAX_EDGE {
        return Err(LineartError::invalid_config(format!(
            "image '{}' ({w}x{h}) would be {target_width}x{target_height} at the target width; \
             edges are limited to {}",
            path.display(),
            Canvas::MAX_EDGE
        )));
    }
    Ok(normalize_rgba8(&rgba, target_width))
}

pub(crate) fn normalize_rgba8(rgba: &image::RgbaImage, target_width: u32) -> PreparedImage {
    let (w, h) = rgba.dimensions();
    let target_height = normalized_height(target_width, w, h);
    let resized = if (w, h) == (target_width, target_height) {
        rgba.clone()
    } else {
        image::imageops::resize(rgba, target_width, target_height, FilterType::Triangle)
    };

    let mut rgba8_premul = resized.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    PreparedImage {
        width: target_width,
        height: target_height,
        rgba8_premul: Arc::new(rgba8_premul),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
