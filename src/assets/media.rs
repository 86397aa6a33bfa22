use std::io::{ErrorKind, Read};
use std::process::{Child, ChildStderr, ChildStdout, Command, Stdio};

use crate::encode::clip::Clip;
use crate::encode::ffmpeg::is_ffmpeg_on_path;
use crate::foundation::core::Canvas;
use crate::foundation::error::{LineartError, LineartResult};
use crate::foundation::math::premultiply_rgba8_in_place;
use crate::render::frame::FrameRGBA;

/// File extensions treated as video sources.
pub const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "avi", "mov", "mkv"];

/// Whether `path` names a video file by its extension (case-insensitive).
pub fn is_video_path(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| VIDEO_EXTENSIONS.iter().any(|v| e.eq_ignore_ascii_case(v)))
}

/// Sequential RGBA frames decoded from a video file by a streaming `ffmpeg` process.
pub(crate) struct VideoFrames {
    clip: Clip,
    child: Option<Child>,
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
}

impl VideoFrames {
    /// Start decoding `clip` from its first frame.
    pub(crate) fn open(clip: &Clip) -> LineartResult<Self> {
        if !is_ffmpeg_on_path() {
            return Err(LineartError::resource(
                "ffmpeg is required to decode video files, but was not found on PATH",
            ));
        }
        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-i"])
            .arg(&clip.path)
            .args(["-f", "rawvideo", "-pix_fmt", "rgba", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| LineartError::resource(format!("failed to spawn ffmpeg decoder: {e}")))?;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        Ok(Self {
            clip: clip.clone(),
            child: Some(child),
            stdout,
            stderr,
        })
    }

    /// Next decoded frame (premultiplied), or `None` once the stream is exhausted.
    pub(crate) fn next_frame(&mut self) -> LineartResult<Option<FrameRGBA>> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };
        let canvas = Canvas::new(self.clip.width, self.clip.height)?;
        let mut data = vec![0u8; canvas.rgba_len()];
        match stdout.read_exact(&mut data) {
            Ok(()) => {
                premultiply_rgba8_in_place(&mut data);
                Ok(Some(FrameRGBA {
                    width: canvas.width,
                    height: canvas.height,
                    data,
                }))
            }
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                self.finish()?;
                Ok(None)
            }
            Err(e) => Err(LineartError::resource(format!(
                "failed to read decoded frames of '{}': {e}",
                self.clip.path.display()
            ))),
        }
    }

    fn finish(&mut self) -> LineartResult<()> {
        self.stdout = None;
        let mut stderr = String::new();
        if let Some(mut pipe) = self.stderr.take() {
            let _ = pipe.read_to_string(&mut stderr);
        }
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = child
            .wait()
            .map_err(|e| LineartError::resource(format!("failed to wait for ffmpeg: {e}")))?;
        if !status.success() {
            return Err(LineartError::resource(format!(
                "ffmpeg failed to decode '{}': {}",
                self.clip.path.display(),
                stderr.trim()
            )));
        }
        Ok(())
    }
}

impl Drop for VideoFrames {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
