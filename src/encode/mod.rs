//! Encoding sinks and finished-clip handles.
//!
//! Sinks consume composed frames in timeline order; the simulation driver and the stitcher both
//! write through the [`sink::FrameSink`] trait.

/// Handle to a finished video file.
pub mod clip;
/// `ffmpeg`-based sink (system `ffmpeg` binary).
pub mod ffmpeg;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;
