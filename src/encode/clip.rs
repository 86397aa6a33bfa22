use std::path::{Path, PathBuf};

use crate::encode::ffmpeg::{ensure_parent_dir, is_ffprobe_on_path, run_ffmpeg};
use crate::foundation::core::Fps;
use crate::foundation::error::{LineartError, LineartResult};

/// A finished video file and the metadata needed to process it further.
#[derive(Clone, Debug, PartialEq)]
pub struct Clip {
    /// Location of the encoded file.
    pub path: PathBuf,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Frame rate.
    pub fps: Fps,
    /// Number of frames in the video stream.
    pub frame_count: u64,
}

impl Clip {
    /// Playback length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.frame_count)
    }

    /// Read metadata of an existing video file through `ffprobe`.
    pub fn probe(path: impl AsRef<Path>) -> LineartResult<Self> {
        let path = path.as_ref();
        if !is_ffprobe_on_path() {
            return Err(LineartError::resource(
                "ffprobe is required to inspect video files, but was not found on PATH",
            ));
        }
        let out = std::process::Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-count_frames",
                "-print_format",
                "json",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .map_err(|e| LineartError::resource(format!("failed to run ffprobe: {e}")))?;
        if !out.status.success() {
            return Err(LineartError::resource(format!(
                "cannot open video '{}': {}",
                path.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        clip_from_probe_json(path, &out.stdout)
    }

    /// Re-encode to H.264/yuv420p MP4 at `out_path` for broad playback support.
    pub fn compress_h264(&self, out_path: impl Into<PathBuf>) -> LineartResult<Clip> {
        let out_path = out_path.into();
        ensure_parent_dir(&out_path)?;
        let args: Vec<std::ffi::OsString> = vec![
            "-i".into(),
            self.path.clone().into_os_string(),
            "-vcodec".into(),
            "libx264".into(),
            "-pix_fmt".into(),
            "yuv420p".into(),
            // yuv420p needs even dimensions; round odd edges down.
            "-vf".into(),
            "scale=trunc(iw/2)*2:trunc(ih/2)*2".into(),
            "-movflags".into(),
            "+faststart".into(),
            out_path.clone().into_os_string(),
        ];
        run_ffmpeg(args, "compress video")?;
        tracing::info!(
            from = %self.path.display(),
            to = %out_path.display(),
            "compressed clip to h264"
        );
        Ok(Clip {
            path: out_path,
            width: self.width - self.width % 2,
            height: self.height - self.height % 2,
            ..self.clone()
        })
    }
}

fn clip_from_probe_json(path: &Path, json: &[u8]) -> LineartResult<Clip> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
        nb_read_frames: Option<String>,
        nb_frames: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        #[serde(default)]
        streams: Vec<ProbeStream>,
    }

    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| LineartError::resource(format!("ffprobe json parse failed: {e}")))?;
    let stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref().is_none_or(|t| t == "video"))
        .ok_or_else(|| {
            LineartError::resource(format!("no video stream found in '{}'", path.display()))
        })?;
    let (Some(width), Some(height)) = (stream.width, stream.height) else {
        return Err(LineartError::resource(format!(
            "missing video dimensions for '{}'",
            path.display()
        )));
    };
    let fps = stream
        .r_frame_rate
        .as_deref()
        .map(parse_frame_rate)
        .transpose()?
        .ok_or_else(|| LineartError::resource("missing frame rate from ffprobe"))?;
    let frame_count = stream
        .nb_read_frames
        .as_deref()
        .or(stream.nb_frames.as_deref())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);

    Ok(Clip {
        path: path.to_path_buf(),
        width,
        height,
        fps,
        frame_count,
    })
}

fn parse_frame_rate(s: &str) -> LineartResult<Fps> {
    let bad = || LineartError::resource(format!("unrecognized frame rate '{s}'"));
    match s.split_once('/') {
        Some((num, den)) => {
            let num = num.trim().parse::<u32>().map_err(|_| bad())?;
            let den = den.trim().parse::<u32>().map_err(|_| bad())?;
            Fps::new(num, den).map_err(|_| bad())
        }
        None => Fps::whole(s.trim().parse::<u32>().map_err(|_| bad())?).map_err(|_| bad()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/clip.rs"]
mod tests;
