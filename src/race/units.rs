use crate::foundation::core::Fps;
use crate::foundation::error::{LineartError, LineartResult};
use crate::race::track::TrackLayout;

/// Conversion between physical race distance and pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceScale {
    distance_per_pixel: f64,
}

impl DistanceScale {
    /// Scale that maps `race_distance` onto the pixels between the start and finish lines.
    pub fn new(race_distance: f64, start_line_x: f64, finish_line_x: f64) -> LineartResult<Self> {
        let span = finish_line_x - start_line_x;
        if !(span > 0.0) {
            return Err(LineartError::invalid_config(format!(
                "finish line ({finish_line_x}px) must lie right of the start zone ({start_line_x}px)"
            )));
        }
        if !race_distance.is_finite() || race_distance <= 0.0 {
            return Err(LineartError::invalid_config(
                "race distance must be finite and > 0",
            ));
        }
        Ok(Self {
            distance_per_pixel: race_distance / span,
        })
    }

    /// Scale for a computed track layout.
    pub fn for_track(race_distance: f64, track: &TrackLayout) -> LineartResult<Self> {
        Self::new(race_distance, track.start_line_x, track.finish_line_x)
    }

    /// Physical distance covered by one pixel.
    pub fn distance_per_pixel(&self) -> f64 {
        self.distance_per_pixel
    }

    /// Pixels advanced per frame by something moving at `physical_speed`.
    pub fn pixel_speed(&self, physical_speed: f64, fps: Fps, simulation_speed: f64) -> f64 {
        physical_speed * simulation_speed / fps.as_f64() / self.distance_per_pixel
    }

    /// Physical distance spanned by `px` pixels.
    pub fn pixels_to_distance(&self, px: f64) -> f64 {
        px * self.distance_per_pixel
    }
}

#[cfg(test)]
#[path = "../../tests/unit/race/units.rs"]
mod tests;
