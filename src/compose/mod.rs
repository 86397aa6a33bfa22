//! Clip-level tools built on the encoders: concatenating stills and videos, retiming videos and
//! drawing text cards.

/// Playback speed changes.
pub mod speed;
/// Concatenation of stills and videos with letterbox padding.
pub mod stitch;
/// Text card rendering.
pub mod text_image;
