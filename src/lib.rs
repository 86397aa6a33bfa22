//! Lineart renders race simulations to video.
//!
//! Characters are loaded from images, scaled to a common width and moved across a track at fixed
//! physical speeds. Every simulation tick is composed into one frame and streamed into a
//! [`FrameSink`]; the driver pads the output to the requested duration and finalizes it.
//!
//! - Describe a race with [`RaceConfig`] and [`ParticipantSpec`]s (or a JSON [`RaceFile`])
//! - Prepare it with [`RaceSimulation::new`]
//! - Run it into an [`InMemorySink`] or an [`FfmpegSink`]
//!
//! The [`compose`] module adds clip-level tools: stitching, speed changes and text cards.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assets;
mod foundation;

pub mod compose;
pub mod encode;
pub mod race;
pub mod render;

pub use crate::assets::decode::{PreparedImage, load_normalized, normalized_height};
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Point, Rect, Rgba8};
pub use crate::foundation::error::{LineartError, LineartResult};

pub use crate::compose::speed::change_speed;
pub use crate::compose::stitch::{StitchItem, StitchOpts, stitch};
pub use crate::compose::text_image::{TextImageOpts, render_text_image, save_text_image};
pub use crate::encode::clip::Clip;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, VideoCodec};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::race::config::{ParticipantSpec, RaceConfig, RaceFile, UnitLabels};
pub use crate::race::driver::{
    FinishRecord, RaceReport, RaceSimulation, RunPhase, Termination, render_race_to_file,
};
pub use crate::render::frame::FrameRGBA;
