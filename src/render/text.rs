use std::path::Path;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{LineartError, LineartResult};

/// Brush payload carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Shapes single-line text with one font at one size.
///
/// The font is registered once at construction; every layout reuses the same Parley contexts.
pub struct TextRenderer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
    size_px: f32,
}

impl TextRenderer {
    /// Build a renderer from raw font bytes (TTF/OTF).
    pub fn from_bytes(font_bytes: Vec<u8>, size_px: f32) -> LineartResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(LineartError::invalid_config(
                "font size must be finite and > 0",
            ));
        }

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| LineartError::resource("no font families found in font data"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| LineartError::resource("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
            size_px,
        })
    }

    /// Read a font file and build a renderer.
    pub fn from_path(path: &Path, size_px: f32) -> LineartResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            LineartError::resource(format!("failed to read font '{}': {e}", path.display()))
        })?;
        Self::from_bytes(bytes, size_px)
    }

    /// Build a renderer from the first sans-serif font found in the usual system locations.
    ///
    /// Returns `Ok(None)` when none of the known files exist.
    pub fn system_default(size_px: f32) -> LineartResult<Option<Self>> {
        match system_sans_path() {
            Some(path) => {
                tracing::debug!(font = %path.display(), "using system font for overlays");
                Self::from_path(path, size_px).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Font size in pixels.
    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    pub(crate) fn font(&self) -> &vello_cpu::peniko::FontData {
        &self.font
    }

    pub(crate) fn layout(
        &mut self,
        text: &str,
        color: Rgba8,
    ) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::from(
            color,
        )));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

const SYSTEM_SANS_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// First existing file from the known sans-serif locations.
pub(crate) fn system_sans_path() -> Option<&'static Path> {
    SYSTEM_SANS_FONTS
        .iter()
        .map(|p| Path::new(*p))
        .find(|p| p.is_file())
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer")
            .field("family_name", &self.family_name)
            .field("size_px", &self.size_px)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
