use std::path::{Path, PathBuf};

use crate::assets::decode::read_rgba8;
use crate::assets::media::{VideoFrames, is_video_path};
use crate::encode::clip::Clip;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, VideoCodec};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex, Rgba8};
use crate::foundation::error::{LineartError, LineartResult};
use crate::foundation::math::premultiply_rgba8_in_place;
use crate::render::frame::FrameRGBA;

/// One input of a stitched video.
#[derive(Clone, Debug, PartialEq)]
pub struct StitchItem {
    /// Still image or video file.
    pub path: PathBuf,
    /// Seconds a still image stays on screen. Ignored for videos, which play in full.
    pub duration: f64,
}

impl StitchItem {
    /// Item shown for `duration` seconds when it is a still image.
    pub fn new(path: impl Into<PathBuf>, duration: f64) -> Self {
        Self {
            path: path.into(),
            duration,
        }
    }

    /// Whether the item is decoded as a video.
    pub fn is_video(&self) -> bool {
        is_video_path(&self.path)
    }
}

/// Output settings for [`stitch`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StitchOpts {
    /// Output frame rate.
    pub fps: Fps,
    /// Output codec.
    pub codec: VideoCodec,
    /// Letterbox color around items smaller than the output.
    pub background: Rgba8,
}

impl StitchOpts {
    /// White letterbox, default codec.
    pub fn new(fps: Fps) -> Self {
        Self {
            fps,
            codec: VideoCodec::default(),
            background: Rgba8::WHITE,
        }
    }
}

enum Source {
    Still { frame: FrameRGBA, repeats: u64 },
    Video(Clip),
}

impl Source {
    fn size(&self) -> (u32, u32) {
        match self {
            Self::Still { frame, .. } => (frame.width, frame.height),
            Self::Video(clip) => (clip.width, clip.height),
        }
    }
}

/// Concatenate still images and videos into one video at `out_path`.
///
/// Every item is centered on a canvas as large as the widest and the tallest item.
#[tracing::instrument(skip_all, fields(items = items.len(), out = %out_path.as_ref().display()))]
pub fn stitch(
    items: &[StitchItem],
    out_path: impl AsRef<Path>,
    opts: StitchOpts,
) -> LineartResult<Clip> {
    let out_path = out_path.as_ref();
    let mut sink = FfmpegSink::new(
        FfmpegSinkOpts::new(out_path)
            .with_codec(opts.codec)
            .with_background(opts.background),
    );
    let summary = stitch_into(items, opts, &mut sink)?;
    Ok(Clip {
        path: out_path.to_path_buf(),
        width: summary.canvas.width,
        height: summary.canvas.height,
        fps: opts.fps,
        frame_count: summary.frames,
    })
}

/// What [`stitch_into`] wrote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StitchSummary {
    /// Output size.
    pub canvas: Canvas,
    /// Frames pushed to the sink.
    pub frames: u64,
}

/// Stitch `items` into `sink`. Every item is opened before the sink is.
pub fn stitch_into(
    items: &[StitchItem],
    opts: StitchOpts,
    sink: &mut dyn FrameSink,
) -> LineartResult<StitchSummary> {
    if items.is_empty() {
        return Err(LineartError::invalid_config("nothing to stitch"));
    }
    let sources = items
        .iter()
        .map(|item| prepare(item, opts.fps))
        .collect::<LineartResult<Vec<_>>>()?;
    let canvas = output_canvas(&sources, opts.codec)?;
    tracing::debug!(width = canvas.width, height = canvas.height, "stitch canvas");

    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps: opts.fps,
    })?;
    match write_all(&sources, canvas, opts.background, sink) {
        Ok(frames) => {
            sink.end()?;
            tracing::info!(frames, "stitched");
            Ok(StitchSummary { canvas, frames })
        }
        Err(e) => {
            sink.abort();
            Err(e)
        }
    }
}

fn prepare(item: &StitchItem, fps: Fps) -> LineartResult<Source> {
    if item.is_video() {
        return Ok(Source::Video(Clip::probe(&item.path)?));
    }
    if !item.duration.is_finite() || item.duration < 0.0 {
        return Err(LineartError::invalid_config(format!(
            "still '{}' needs a finite, non-negative duration, got {}",
            item.path.display(),
            item.duration
        )));
    }
    let rgba = read_rgba8(&item.path)?;
    let (width, height) = rgba.dimensions();
    let mut data = rgba.into_raw();
    premultiply_rgba8_in_place(&mut data);
    Ok(Source::Still {
        frame: FrameRGBA {
            width,
            height,
            data,
        },
        repeats: fps.secs_to_frames_trunc(item.duration),
    })
}

fn output_canvas(sources: &[Source], codec: VideoCodec) -> LineartResult<Canvas> {
    let (mut width, mut height) = sources
        .iter()
        .map(Source::size)
        .fold((0, 0), |(w, h), (sw, sh)| (w.max(sw), h.max(sh)));
    if codec.requires_even_dimensions() {
        width += width % 2;
        height += height % 2;
    }
    Canvas::new(width, height)
}

fn letterbox(src: &FrameRGBA, canvas: Canvas, background: Rgba8) -> FrameRGBA {
    if src.width == canvas.width && src.height == canvas.height {
        return src.clone();
    }
    let mut out = FrameRGBA::filled(canvas, background.to_array());
    out.blit(
        src,
        (canvas.width - src.width) / 2,
        (canvas.height - src.height) / 2,
    );
    out
}

fn write_all(
    sources: &[Source],
    canvas: Canvas,
    background: Rgba8,
    sink: &mut dyn FrameSink,
) -> LineartResult<u64> {
    let mut next = FrameIndex(0);
    for source in sources {
        match source {
            Source::Still { frame, repeats } => {
                let framed = letterbox(frame, canvas, background);
                for _ in 0..*repeats {
                    sink.push_frame(next, &framed)?;
                    next = next.next();
                }
            }
            Source::Video(clip) => {
                let mut frames = VideoFrames::open(clip)?;
                while let Some(frame) = frames.next_frame()? {
                    sink.push_frame(next, &letterbox(&frame, canvas, background))?;
                    next = next.next();
                }
            }
        }
    }
    Ok(next.0)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/stitch.rs"]
mod tests;
