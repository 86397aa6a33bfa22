use std::path::{Path, PathBuf};

use crate::encode::clip::Clip;
use crate::encode::ffmpeg::{ensure_parent_dir, run_ffmpeg};
use crate::foundation::error::{LineartError, LineartResult};

/// `setpts` expression that plays a video `factor` times as fast.
pub fn setpts_filter(factor: f64) -> LineartResult<String> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(LineartError::invalid_config(format!(
            "speed factor must be finite and > 0, got {factor}"
        )));
    }
    Ok(format!("setpts=PTS/{factor}"))
}

/// Write a copy of `input` played `factor` times as fast to `output`, without audio.
pub fn change_speed(
    input: impl AsRef<Path>,
    output: impl Into<PathBuf>,
    factor: f64,
) -> LineartResult<Clip> {
    let input = input.as_ref();
    let output = output.into();
    let filter = setpts_filter(factor)?;
    if !input.is_file() {
        return Err(LineartError::resource(format!(
            "input video '{}' does not exist",
            input.display()
        )));
    }
    ensure_parent_dir(&output)?;
    let args: Vec<std::ffi::OsString> = vec![
        "-i".into(),
        input.as_os_str().to_owned(),
        "-filter:v".into(),
        filter.into(),
        "-an".into(),
        output.clone().into_os_string(),
    ];
    run_ffmpeg(args, "change video speed")?;
    tracing::info!(
        from = %input.display(),
        to = %output.display(),
        factor,
        "changed clip speed"
    );
    Clip::probe(&output)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/speed.rs"]
mod tests;
