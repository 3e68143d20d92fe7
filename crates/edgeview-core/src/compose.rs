//! Expansion of single-channel results back to the display format

use crate::error::Result;
use crate::types::{PixelBuffer, PixelFormat, PixelView};

/// Replicate a Gray8 frame into a fresh RGBA8 frame (`R = G = B = v`,
/// `A = 255`).
pub fn to_rgba(src: PixelView<'_>) -> Result<PixelBuffer> {
    src.require(PixelFormat::Gray8)?;

    let mut out = Vec::with_capacity(src.data().len() * 4);
    for &v in src.data() {
        out.extend_from_slice(&[v, v, v, u8::MAX]);
    }

    Ok(PixelBuffer::from_parts(
        src.width(),
        src.height(),
        PixelFormat::Rgba8,
        out,
    ))
}

/// Copy an RGBA8 frame unchanged.
pub fn passthrough(src: PixelView<'_>) -> Result<PixelBuffer> {
    src.require(PixelFormat::Rgba8)?;
    Ok(src.to_owned_buffer())
}
