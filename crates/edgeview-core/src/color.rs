//! RGBA to luminance conversion
//!
//! Uses the BT.601 luma weights `0.299 R + 0.587 G + 0.114 B`, rounded to
//! nearest. The arithmetic is integer (weights scaled by 1000) so the result
//! is exact and identical on every platform. Alpha is ignored.

use crate::error::Result;
use crate::types::{PixelBuffer, PixelFormat, PixelView};

const WEIGHT_R: u32 = 299;
const WEIGHT_G: u32 = 587;
const WEIGHT_B: u32 = 114;
const WEIGHT_SUM: u32 = WEIGHT_R + WEIGHT_G + WEIGHT_B;

/// Luma of a single pixel.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let weighted = WEIGHT_R * r as u32 + WEIGHT_G * g as u32 + WEIGHT_B * b as u32;
    // Ties round up, matching round-half-away-from-zero for non-negative values.
    ((weighted + WEIGHT_SUM / 2) / WEIGHT_SUM) as u8
}

/// Convert an RGBA8 frame to a Gray8 frame of the same size.
pub fn to_gray(src: PixelView<'_>) -> Result<PixelBuffer> {
    src.require(PixelFormat::Rgba8)?;

    let gray = src
        .data()
        .chunks_exact(4)
        .map(|px| luma(px[0], px[1], px[2]))
        .collect();

    Ok(PixelBuffer::from_parts(
        src.width(),
        src.height(),
        PixelFormat::Gray8,
        gray,
    ))
}
