use crate::foundation::core::{Canvas, Rgba8};
use crate::render::scene::RuleDraw;

/// Horizontal gap between the finish line and the overlay column.
pub const LABEL_OFFSET_PX: f64 = 20.0;

/// Static track geometry, fixed for a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackLayout {
    /// Video width in pixels.
    pub video_width: f64,
    /// Video height in pixels.
    pub video_height: f64,
    /// Column at which participants stop.
    pub finish_line_x: f64,
    /// Column where the track starts; equal to the normalized character width.
    pub start_line_x: f64,
    /// Row of the horizontal baseline near the bottom.
    pub baseline_y: f64,
}

impl TrackLayout {
    /// Compute the layout. `canvas` has already been validated.
    pub fn new(canvas: Canvas, finish_fraction: f64, character_width: u32) -> Self {
        let video_width = f64::from(canvas.width);
        let video_height = f64::from(canvas.height);
        Self {
            video_width,
            video_height,
            finish_line_x: video_width - finish_fraction * video_width,
            start_line_x: f64::from(character_width),
            baseline_y: video_height - 0.1 * video_height,
        }
    }

    /// Pixel length of the track between the start and finish lines.
    pub fn track_span_px(&self) -> f64 {
        self.finish_line_x - self.start_line_x
    }

    /// Left edge of the overlay column.
    pub fn label_x(&self) -> f64 {
        self.finish_line_x + LABEL_OFFSET_PX
    }

    /// Start line, finish line and baseline.
    pub fn rules(&self) -> [RuleDraw; 3] {
        [
            RuleDraw::vertical(self.start_line_x, 0.0, self.video_height, Rgba8::RED),
            RuleDraw::vertical(self.finish_line_x, 0.0, self.video_height, Rgba8::RED),
            RuleDraw::horizontal(self.baseline_y, 0.0, self.finish_line_x, Rgba8::BLACK),
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/race/track.rs"]
mod tests;
