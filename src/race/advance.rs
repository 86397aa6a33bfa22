use crate::encode::sink::FrameSink;
use crate::foundation::core::{Canvas, Fps, FrameIndex, Rgba8};
use crate::foundation::error::LineartResult;
use crate::race::config::UnitLabels;
use crate::race::participant::Participant;
use crate::race::track::TrackLayout;
use crate::race::units::DistanceScale;
use crate::render::compositor::Compositor;
use crate::render::frame::FrameRGBA;
use crate::render::scene::FrameScene;

/// Vertical spacing between overlay lines of one participant.
const LINE_STEP_PX: f64 = 20.0;
/// Gap between the last participant row and the race clock.
const CLOCK_GAP_PX: f64 = 100.0;
const TITLE_Y_PX: f64 = 10.0;

/// Fixed inputs the advancer needs besides the participants.
#[derive(Clone, Debug)]
pub struct AdvanceParams {
    /// Output canvas.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Simulated seconds per video second.
    pub simulation_speed: f64,
    /// Normalized character width.
    pub target_width: u32,
    /// Title overlay.
    pub title: String,
    /// Overlay unit names.
    pub units: UnitLabels,
}

/// Advances participants one frame at a time and composes each frame.
#[derive(Debug)]
pub struct FrameAdvancer {
    participants: Vec<Participant>,
    finish_frames: Vec<Option<FrameIndex>>,
    track: TrackLayout,
    scale: DistanceScale,
    params: AdvanceParams,
}

impl FrameAdvancer {
    /// Create an advancer over participants placed at their starting positions.
    pub fn new(
        participants: Vec<Participant>,
        track: TrackLayout,
        scale: DistanceScale,
        params: AdvanceParams,
    ) -> Self {
        let finish_frames = vec![None; participants.len()];
        Self {
            participants,
            finish_frames,
            track,
            scale,
            params,
        }
    }

    /// Participants in lane order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Frame on which each participant stopped, in lane order.
    pub fn finish_frames(&self) -> &[Option<FrameIndex>] {
        &self.finish_frames
    }

    /// Track geometry.
    pub fn track(&self) -> &TrackLayout {
        &self.track
    }

    /// Whether every participant has stopped.
    pub fn all_stopped(&self) -> bool {
        self.participants.iter().all(Participant::is_stopped)
    }

    /// Seconds of video elapsed at the start of `frame`.
    pub fn elapsed_secs(&self, frame: FrameIndex) -> f64 {
        self.params.fps.frames_to_secs(frame.0)
    }

    /// Simulated time shown on the race clock for `frame`.
    pub fn race_clock(&self, frame: FrameIndex) -> f64 {
        self.elapsed_secs(frame) * self.params.simulation_speed
    }

    /// Physical distance covered by a participant, measured from its image's right edge.
    pub fn distance_covered(&self, p: &Participant) -> f64 {
        let px = p.right_px() - i64::from(self.params.target_width);
        self.scale.pixels_to_distance(px as f64)
    }

    /// Move every running participant to its position for `frame`, detect finish line arrivals
    /// and describe the resulting frame.
    pub fn advance(&mut self, frame: FrameIndex) -> FrameScene {
        let finish_line_x = self.track.finish_line_x;
        for (i, p) in self.participants.iter_mut().enumerate() {
            if p.advance_to(frame, finish_line_x) {
                self.finish_frames[i] = Some(frame);
                tracing::debug!(
                    participant = p.name(),
                    frame = frame.0,
                    right_px = p.right_px(),
                    "participant reached the finish line"
                );
            }
        }
        self.scene(frame)
    }

    /// Describe the frame for the current participant state.
    pub fn scene(&self, frame: FrameIndex) -> FrameScene {
        let mut scene = FrameScene::new(self.params.canvas, Rgba8::WHITE);
        let units = &self.params.units;
        let label_x = self.track.label_x();

        for p in &self.participants {
            scene.sprites.push(p.sprite());

            let row = p.top_px() as f64;
            let distance = self.distance_covered(p);
            let time = distance / p.physical_speed();
            scene.text(p.name(), label_x, row, Rgba8::BLACK);
            scene.text(
                format!("Distance: {distance:.2} {}", units.distance),
                label_x,
                row + LINE_STEP_PX,
                Rgba8::BLACK,
            );
            scene.text(
                format!("Time: {time:.2} {}", units.time),
                label_x,
                row + 2.0 * LINE_STEP_PX,
                Rgba8::BLACK,
            );
            scene.text(
                format!("Speed: {} {}", p.physical_speed(), units.speed),
                label_x,
                row + 3.0 * LINE_STEP_PX,
                Rgba8::BLACK,
            );
        }

        if let Some(last) = self.participants.last() {
            scene.text(
                format!("Time: {:.2} {}", self.race_clock(frame), units.time),
                label_x,
                last.top_px() as f64 + CLOCK_GAP_PX,
                Rgba8::BLACK,
            );
        }
        scene.text(self.params.title.clone(), label_x, TITLE_Y_PX, Rgba8::BLACK);
        scene.rules.extend(self.track.rules());
        scene
    }

    /// Advance to `frame`, compose it and emit it to `sink`. Returns the composed frame.
    pub fn tick(
        &mut self,
        frame: FrameIndex,
        compositor: &mut Compositor,
        sink: &mut dyn FrameSink,
    ) -> LineartResult<FrameRGBA> {
        let scene = self.advance(frame);
        let rgba = compositor.compose(&scene)?;
        sink.push_frame(frame, &rgba)?;
        Ok(rgba)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/race/advance.rs"]
mod tests;
