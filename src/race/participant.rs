use std::path::Path;

use crate::assets::decode::{PreparedImage, load_normalized};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::LineartResult;
use crate::race::config::ParticipantSpec;
use crate::render::scene::SpriteDraw;

/// Mutable per-character state for one run.
#[derive(Clone, Debug)]
pub struct Participant {
    slot: usize,
    name: String,
    image: PreparedImage,
    physical_speed: f64,
    pixel_speed: f64,
    origin_x: f64,
    x: f64,
    y: i64,
    stopped: bool,
}

impl Participant {
    /// Decode and normalize the descriptor's image, then place the participant at its start.
    ///
    /// `spec` must already be validated.
    pub fn load(
        slot: usize,
        spec: &ParticipantSpec,
        target_width: u32,
        pixel_speed: f64,
    ) -> LineartResult<Self> {
        let image = load_normalized(Path::new(&spec.image), target_width)?;
        Ok(Self::with_image(slot, spec, image, pixel_speed))
    }

    /// Build a participant from an already prepared image.
    pub fn with_image(
        slot: usize,
        spec: &ParticipantSpec,
        image: PreparedImage,
        pixel_speed: f64,
    ) -> Self {
        let [x, y] = spec.location;
        Self {
            slot,
            name: spec.name.clone(),
            image,
            physical_speed: spec.speed,
            pixel_speed,
            origin_x: x as f64,
            x: x as f64,
            y,
            stopped: false,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Speed in physical units, as given at setup.
    pub fn physical_speed(&self) -> f64 {
        self.physical_speed
    }

    /// Pixels advanced per frame.
    pub fn pixel_speed(&self) -> f64 {
        self.pixel_speed
    }

    /// Exact (unrounded) horizontal position.
    pub fn position_x(&self) -> f64 {
        self.x
    }

    /// Left edge of the drawn image in whole pixels.
    pub fn left_px(&self) -> i64 {
        self.x.round() as i64
    }

    /// Top edge of the drawn image; motion is horizontal only.
    pub fn top_px(&self) -> i64 {
        self.y
    }

    /// Right edge of the drawn image in whole pixels.
    pub fn right_px(&self) -> i64 {
        self.left_px() + i64::from(self.image.width)
    }

    /// Normalized image.
    pub fn image(&self) -> &PreparedImage {
        &self.image
    }

    /// Whether the participant has reached the finish line.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Move to the position for `frame` unless already stopped, then test the finish line.
    ///
    /// Returns `true` only on the frame that stops the participant. The position that crossed the
    /// line is kept as is, so the stopping frame may show the image past the line.
    pub fn advance_to(&mut self, frame: FrameIndex, finish_line_x: f64) -> bool {
        if self.stopped {
            return false;
        }
        self.x = self.origin_x + self.pixel_speed * frame.0 as f64;
        if self.right_px() as f64 >= finish_line_x {
            self.stopped = true;
            return true;
        }
        false
    }

    pub(crate) fn sprite(&self) -> SpriteDraw {
        SpriteDraw {
            slot: self.slot,
            image: self.image.clone(),
            origin: (self.left_px(), self.top_px()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/race/participant.rs"]
mod tests;
