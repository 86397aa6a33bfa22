use crate::assets::decode::PreparedImage;
use crate::foundation::core::{Canvas, Point, Rect, Rgba8};

/// An image placed on the canvas.
#[derive(Clone, Debug)]
pub struct SpriteDraw {
    /// Stable slot for the image across frames; the compositor caches paints per slot.
    pub slot: usize,
    /// Premultiplied image pixels.
    pub image: PreparedImage,
    /// Top-left pixel position. May lie partly or wholly outside the canvas.
    pub origin: (i64, i64),
}

/// A single line of text with its top-left corner at `origin`.
#[derive(Clone, Debug, PartialEq)]
pub struct TextDraw {
    /// Text content.
    pub text: String,
    /// Top-left corner of the text box.
    pub origin: Point,
    /// Fill color.
    pub color: Rgba8,
}

/// An axis-aligned reference line, drawn as a filled rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RuleDraw {
    /// Covered area.
    pub rect: Rect,
    /// Fill color.
    pub color: Rgba8,
}

impl RuleDraw {
    /// One pixel wide vertical line at column `x` from `y0` to `y1`.
    pub fn vertical(x: f64, y0: f64, y1: f64, color: Rgba8) -> Self {
        let x = x.floor();
        Self {
            rect: Rect::new(x, y0, x + 1.0, y1),
            color,
        }
    }

    /// One pixel tall horizontal line at row `y` from `x0` to `x1`.
    pub fn horizontal(y: f64, x0: f64, x1: f64, color: Rgba8) -> Self {
        let y = y.floor();
        Self {
            rect: Rect::new(x0, y, x1, y + 1.0),
            color,
        }
    }
}

/// Everything drawn in one frame, in paint order: background, sprites, rules, text.
#[derive(Clone, Debug)]
pub struct FrameScene {
    /// Output size.
    pub canvas: Canvas,
    /// Background fill.
    pub background: Rgba8,
    /// Images, painted first to last.
    pub sprites: Vec<SpriteDraw>,
    /// Reference lines.
    pub rules: Vec<RuleDraw>,
    /// Text overlays.
    pub texts: Vec<TextDraw>,
}

impl FrameScene {
    /// Empty scene with a solid background.
    pub fn new(canvas: Canvas, background: Rgba8) -> Self {
        Self {
            canvas,
            background,
            sprites: Vec::new(),
            rules: Vec::new(),
            texts: Vec::new(),
        }
    }

    /// Append a text overlay.
    pub fn text(&mut self, text: impl Into<String>, x: f64, y: f64, color: Rgba8) {
        self.texts.push(TextDraw {
            text: text.into(),
            origin: Point::new(x, y),
            color,
        });
    }
}
