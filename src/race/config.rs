use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::ffmpeg::VideoCodec;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{LineartError, LineartResult};

/// Unit names printed in the overlays.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UnitLabels {
    /// Distance unit, e.g. `"miles"`.
    #[serde(alias = "distance_string")]
    pub distance: String,
    /// Time unit, e.g. `"hours"`.
    #[serde(alias = "time_string")]
    pub time: String,
    /// Speed unit, e.g. `"miles/hour"`.
    #[serde(alias = "speed_string")]
    pub speed: String,
}

impl Default for UnitLabels {
    fn default() -> Self {
        Self {
            distance: "miles".to_string(),
            time: "hours".to_string(),
            speed: "miles/hour".to_string(),
        }
    }
}

/// Video and simulation parameters of a race run. Every field has a default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Output frame rate.
    pub fps: u32,
    /// Output width in pixels.
    #[serde(alias = "vid_width")]
    pub width: u32,
    /// Output height in pixels.
    #[serde(alias = "vid_height")]
    pub height: u32,
    /// Hard cap on rendered frames.
    pub max_frames: u64,
    /// Width every character image is scaled to; also the start line column.
    pub target_width: u32,
    /// Simulated seconds per video second.
    pub simulation_speed: f64,
    /// Physical length of the track between the start and finish lines.
    pub race_distance: f64,
    /// Requested output length in seconds.
    pub duration: f64,
    /// Fraction of the width kept to the right of the finish line for the overlays.
    #[serde(alias = "end_line_scale")]
    pub finish_fraction: f64,
    /// Title overlay.
    #[serde(alias = "vid_title")]
    pub title: String,
    /// Overlay unit names.
    pub units: UnitLabels,
    /// Font file for text overlays. Without one, a system sans-serif font is used, and the
    /// overlays are omitted only when none is installed.
    pub font: Option<PathBuf>,
    /// Overlay font size in pixels.
    pub font_size: f32,
    /// Output codec.
    pub codec: VideoCodec,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            fps: 10,
            width: 800,
            height: 600,
            max_frames: 500,
            target_width: 100,
            simulation_speed: 1.0,
            race_distance: 100.0,
            duration: 10.0,
            finish_fraction: 0.3,
            title: "Race".to_string(),
            units: UnitLabels::default(),
            font: None,
            font_size: 18.0,
            codec: VideoCodec::default(),
        }
    }
}

impl RaceConfig {
    /// Validated frame rate.
    pub fn frame_rate(&self) -> LineartResult<Fps> {
        Fps::whole(self.fps)
    }

    /// Validated output canvas.
    pub fn canvas(&self) -> LineartResult<Canvas> {
        Canvas::new(self.width, self.height)
    }

    /// Number of frames the requested duration maps to.
    pub fn requested_frames(&self) -> LineartResult<u64> {
        Ok(self.frame_rate()?.secs_to_frames_round(self.duration))
    }

    /// Reject every invalid setting. Runs before any file is read or sink opened.
    pub fn validate(&self) -> LineartResult<()> {
        self.frame_rate()?;
        self.canvas()?;
        if self.codec.requires_even_dimensions()
            && (!self.width.is_multiple_of(2) || !self.height.is_multiple_of(2))
        {
            return Err(LineartError::invalid_config(format!(
                "{:?} output needs even dimensions, got {}x{}",
                self.codec, self.width, self.height
            )));
        }
        if self.max_frames == 0 {
            return Err(LineartError::invalid_config("max_frames must be > 0"));
        }
        if self.target_width == 0 || self.target_width > Canvas::MAX_EDGE {
            return Err(LineartError::invalid_config(format!(
                "target_width must be in 1..={}, got {}",
                Canvas::MAX_EDGE,
                self.target_width
            )));
        }
        positive_finite("simulation_speed", self.simulation_speed)?;
        positive_finite("race_distance", self.race_distance)?;
        positive_finite("duration", self.duration)?;
        if !(self.finish_fraction > 0.0 && self.finish_fraction < 1.0) {
            return Err(LineartError::invalid_config(format!(
                "finish_fraction must be strictly between 0 and 1, got {}",
                self.finish_fraction
            )));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(LineartError::invalid_config("font_size must be > 0"));
        }
        if self.requested_frames()? == 0 {
            return Err(LineartError::invalid_config(format!(
                "duration {}s is shorter than one frame at {} fps",
                self.duration, self.fps
            )));
        }
        Ok(())
    }
}

fn positive_finite(name: &str, v: f64) -> LineartResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(LineartError::invalid_config(format!(
            "{name} must be finite and > 0, got {v}"
        )))
    }
}

/// One character in the race.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParticipantSpec {
    /// Display name.
    pub name: String,
    /// Image file representing the character.
    pub image: PathBuf,
    /// Initial top-left pixel position `[x, y]`.
    #[serde(alias = "loc")]
    pub location: [i64; 2],
    /// Physical speed in distance units per time unit.
    pub speed: f64,
}

impl ParticipantSpec {
    /// Reject negative coordinates and non-positive speeds.
    pub fn validate(&self) -> LineartResult<()> {
        let [x, y] = self.location;
        if x < 0 || y < 0 {
            return Err(LineartError::invalid_config(format!(
                "participant '{}' has negative location ({x}, {y})",
                self.name
            )));
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(LineartError::invalid_config(format!(
                "participant '{}' speed must be finite and > 0, got {}",
                self.name, self.speed
            )));
        }
        Ok(())
    }
}

/// A complete race description as read from JSON.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RaceFile {
    /// Characters in lane order.
    pub participants: Vec<ParticipantSpec>,
    /// Run parameters.
    #[serde(default)]
    pub config: RaceConfig,
}

impl RaceFile {
    /// Parse a race description. Malformed or out-of-range values are configuration errors.
    pub fn from_json_str(json: &str) -> LineartResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| LineartError::invalid_config(format!("invalid race description: {e}")))
    }

    /// Read a race description and resolve relative image and font paths against its directory.
    pub fn from_path(path: impl AsRef<Path>) -> LineartResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read race description '{}'", path.display()))?;
        let mut race = Self::from_json_str(&json)?;
        race.resolve_paths(path.parent().unwrap_or_else(|| Path::new(".")));
        Ok(race)
    }

    /// Make relative paths relative to `root`.
    pub fn resolve_paths(&mut self, root: &Path) {
        for p in &mut self.participants {
            p.image = root.join(&p.image);
        }
        if let Some(font) = self.config.font.as_mut() {
            *font = root.join(&*font);
        }
    }

    /// Validate configuration and every participant.
    pub fn validate(&self) -> LineartResult<()> {
        validate_race(&self.config, &self.participants)
    }
}

/// Validate `config` and a non-empty participant list.
pub fn validate_race(config: &RaceConfig, participants: &[ParticipantSpec]) -> LineartResult<()> {
    config.validate()?;
    if participants.is_empty() {
        return Err(LineartError::invalid_config(
            "a race needs at least one participant",
        ));
    }
    for p in participants {
        p.validate()?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/race/config.rs"]
mod tests;
