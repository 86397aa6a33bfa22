use std::path::PathBuf;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{LineartError, LineartResult};
use crate::render::frame::FrameRGBA;

/// Configuration provided to a [`FrameSink`] when a run opens it.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Destination for composed frames.
///
/// Lifecycle: `begin` once, `push_frame` in strictly increasing `FrameIndex` order, then exactly
/// one of `end` (finalize the output) or `abort` (release without finalizing). A sink that
/// failed in `begin` holds no resources.
pub trait FrameSink: Send {
    /// Open the sink. Failure here is fatal for the run.
    fn begin(&mut self, cfg: SinkConfig) -> LineartResult<()>;
    /// Push one frame in strictly increasing timeline order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> LineartResult<()>;
    /// Finalize the output. Calling it twice is an error.
    fn end(&mut self) -> LineartResult<()>;
    /// Release any held resources without producing a finished output.
    fn abort(&mut self);
    /// Path of the file this sink writes, when it writes one.
    fn output_path(&self) -> Option<PathBuf> {
        None
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    open: bool,
    finalized: bool,
    releases: u32,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` completed.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// How many times the sink was released through `end` or `abort`.
    pub fn release_count(&self) -> u32 {
        self.releases
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> LineartResult<()> {
        if self.open {
            return Err(LineartError::render("in-memory sink is already open"));
        }
        self.cfg = Some(cfg);
        self.frames.clear();
        self.open = true;
        self.finalized = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> LineartResult<()> {
        if !self.open {
            return Err(LineartError::render("in-memory sink is not open"));
        }
        if let Some((last, _)) = self.frames.last()
            && idx <= *last
        {
            return Err(LineartError::render(
                "in-memory sink received out-of-order frame index",
            ));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> LineartResult<()> {
        if !self.open {
            return Err(LineartError::render(
                "in-memory sink is not open or already finalized",
            ));
        }
        self.open = false;
        self.finalized = true;
        self.releases += 1;
        Ok(())
    }

    fn abort(&mut self) {
        if self.open {
            self.open = false;
            self.releases += 1;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
