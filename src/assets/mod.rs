//! Image decoding and normalization for participant sprites and stitched stills, plus streaming
//! video frame decode for stitching.

pub(crate) mod decode;
pub(crate) mod media;
