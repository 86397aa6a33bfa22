//! Headless frame composition.
//!
//! A frame is described as plain data ([`scene::FrameScene`]) and rasterized from scratch by a
//! [`compositor::Compositor`]; nothing drawn for one frame can leak into the next.

/// CPU rasterizer for frame scenes.
pub mod compositor;
/// Rendered RGBA8 frames.
pub mod frame;
/// Frame scene description.
pub mod scene;
/// Text shaping for overlays and text cards.
pub mod text;
