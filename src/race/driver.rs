use std::path::PathBuf;

use crate::encode::clip::Clip;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{LineartError, LineartResult};
use crate::race::advance::{AdvanceParams, FrameAdvancer};
use crate::race::config::{ParticipantSpec, RaceConfig, RaceFile, validate_race};
use crate::race::participant::Participant;
use crate::race::track::TrackLayout;
use crate::race::units::DistanceScale;
use crate::render::compositor::Compositor;
use crate::render::frame::FrameRGBA;
use crate::render::text::TextRenderer;

/// Lifecycle of a [`RaceSimulation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunPhase {
    /// Frames are being advanced and emitted.
    Running,
    /// The last frame is repeated to fill the requested duration.
    Draining,
    /// The sink has been released.
    Finalized,
}

/// Why the frame loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Every participant reached the finish line.
    AllFinished,
    /// The requested duration was rendered before everyone finished.
    DurationReached,
    /// The `max_frames` safety cap was hit. The output is shorter than requested.
    FrameCapReached,
}

/// Outcome for one participant.
#[derive(Clone, Debug, PartialEq)]
pub struct FinishRecord {
    /// Display name.
    pub name: String,
    /// Frame on which the participant reached the finish line, if it did.
    pub finish_frame: Option<FrameIndex>,
    /// Physical distance shown for the participant on the last frame.
    pub distance: f64,
}

/// Summary of a completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct RaceReport {
    /// Why the frame loop stopped.
    pub termination: Termination,
    /// Frames produced by advancing the race.
    pub frames_rendered: u64,
    /// Copies of the last frame appended to reach the requested duration.
    pub frames_padded: u64,
    /// Per-participant results in lane order.
    pub finishes: Vec<FinishRecord>,
    /// The written video, when the sink writes a file.
    pub clip: Option<Clip>,
}

impl RaceReport {
    /// Total frames handed to the sink.
    pub fn total_frames(&self) -> u64 {
        self.frames_rendered + self.frames_padded
    }
}

/// A prepared race: participants loaded, track computed, ready to emit frames into a sink.
#[derive(Debug)]
pub struct RaceSimulation {
    advancer: FrameAdvancer,
    compositor: Compositor,
    canvas: Canvas,
    fps: Fps,
    target_frames: u64,
    max_frames: u64,
    phase: RunPhase,
}

impl RaceSimulation {
    /// Validate `config` and every participant, then decode all images and the overlay font.
    ///
    /// Every configuration and resource failure surfaces here, before any sink is opened.
    pub fn new(config: &RaceConfig, participants: &[ParticipantSpec]) -> LineartResult<Self> {
        validate_race(config, participants)?;

        let canvas = config.canvas()?;
        let fps = config.frame_rate()?;
        let track = TrackLayout::new(canvas, config.finish_fraction, config.target_width);
        let scale = DistanceScale::for_track(config.race_distance, &track)?;

        let loaded = participants
            .iter()
            .enumerate()
            .map(|(slot, spec)| {
                let pixel_speed = scale.pixel_speed(spec.speed, fps, config.simulation_speed);
                Participant::load(slot, spec, config.target_width, pixel_speed)
            })
            .collect::<LineartResult<Vec<_>>>()?;

        let text = match config.font.as_deref() {
            Some(path) => Some(TextRenderer::from_path(path, config.font_size)?),
            None => TextRenderer::system_default(config.font_size)?,
        };
        let compositor = Compositor::new(canvas, text)?;

        let target_frames = config.requested_frames()?;
        if target_frames > config.max_frames {
            tracing::warn!(
                target_frames,
                max_frames = config.max_frames,
                "requested duration exceeds the frame cap; output will be cut short"
            );
        }
        tracing::debug!(
            participants = loaded.len(),
            finish_line_x = track.finish_line_x,
            distance_per_pixel = scale.distance_per_pixel(),
            "race prepared"
        );

        let advancer = FrameAdvancer::new(
            loaded,
            track,
            scale,
            AdvanceParams {
                canvas,
                fps,
                simulation_speed: config.simulation_speed,
                target_width: config.target_width,
                title: config.title.clone(),
                units: config.units.clone(),
            },
        );
        Ok(Self {
            advancer,
            compositor,
            canvas,
            fps,
            target_frames,
            max_frames: config.max_frames,
            phase: RunPhase::Running,
        })
    }

    /// Prepare the race described by `race`.
    pub fn from_race_file(race: &RaceFile) -> LineartResult<Self> {
        Self::new(&race.config, &race.participants)
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Frames the requested duration maps to.
    pub fn target_frames(&self) -> u64 {
        self.target_frames
    }

    /// Participants in lane order.
    pub fn participants(&self) -> &[Participant] {
        self.advancer.participants()
    }

    /// Run the race into `sink` and release it.
    ///
    /// The sink is opened once and released exactly once: finalized on success, aborted when a
    /// frame fails. A simulation runs only once.
    #[tracing::instrument(skip_all, fields(frames = self.target_frames))]
    pub fn run(&mut self, sink: &mut dyn FrameSink) -> LineartResult<RaceReport> {
        if self.phase != RunPhase::Running {
            return Err(LineartError::Other(anyhow::anyhow!(
                "race simulation has already run"
            )));
        }
        sink.begin(SinkConfig {
            width: self.canvas.width,
            height: self.canvas.height,
            fps: self.fps,
        })?;

        let drained = self.drive(sink);
        self.phase = RunPhase::Finalized;
        let (termination, frames_rendered, frames_padded) = match drained {
            Ok(counts) => counts,
            Err(e) => {
                tracing::warn!(error = %e, "race aborted");
                sink.abort();
                return Err(e);
            }
        };
        sink.end()?;

        let clip = sink.output_path().map(|path| Clip {
            path,
            width: self.canvas.width,
            height: self.canvas.height,
            fps: self.fps,
            frame_count: frames_rendered + frames_padded,
        });
        let finishes = self
            .advancer
            .participants()
            .iter()
            .zip(self.advancer.finish_frames())
            .map(|(p, &finish_frame)| FinishRecord {
                name: p.name().to_string(),
                finish_frame,
                distance: self.advancer.distance_covered(p),
            })
            .collect();
        tracing::info!(
            ?termination,
            frames_rendered,
            frames_padded,
            "race finalized"
        );
        Ok(RaceReport {
            termination,
            frames_rendered,
            frames_padded,
            finishes,
            clip,
        })
    }

    fn drive(&mut self, sink: &mut dyn FrameSink) -> LineartResult<(Termination, u64, u64)> {
        let mut frame = FrameIndex(0);
        let (termination, last) = loop {
            let rgba = self.advancer.tick(frame, &mut self.compositor, sink)?;
            frame = frame.next();
            let written = frame.0;
            if self.advancer.all_stopped() {
                break (Termination::AllFinished, rgba);
            }
            if written >= self.target_frames {
                break (Termination::DurationReached, rgba);
            }
            if written >= self.max_frames {
                tracing::warn!(
                    max_frames = self.max_frames,
                    target_frames = self.target_frames,
                    "frame cap reached before the race finished"
                );
                break (Termination::FrameCapReached, rgba);
            }
        };
        let frames_rendered = frame.0;

        self.phase = RunPhase::Draining;
        let padding = match termination {
            Termination::FrameCapReached => 0,
            _ => self.target_frames.saturating_sub(frames_rendered),
        };
        pad_with_last(sink, frame, &last, padding)?;
        tracing::debug!(padding, ?termination, "drained");
        Ok((termination, frames_rendered, padding))
    }
}

fn pad_with_last(
    sink: &mut dyn FrameSink,
    first: FrameIndex,
    last: &FrameRGBA,
    count: u64,
) -> LineartResult<()> {
    for i in 0..count {
        sink.push_frame(FrameIndex(first.0 + i), last)?;
    }
    Ok(())
}

/// Render `race` to a video file at `out_path` with the configured codec.
pub fn render_race_to_file(
    race: &RaceFile,
    out_path: impl Into<PathBuf>,
) -> LineartResult<RaceReport> {
    let mut sim = RaceSimulation::from_race_file(race)?;
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(out_path).with_codec(race.config.codec));
    sim.run(&mut sink)
}

#[cfg(test)]
#[path = "../../tests/unit/race/driver.rs"]
mod tests;
