//! Multi-stage edge detection on single-channel frames
//!
//! ```text
//! Gray8 ─▶ smooth (5x5 binomial) ─▶ Sobel gradient ─▶ NMS ─▶ hysteresis ─▶ Gray8 mask
//! ```
//!
//! Every stage consumes the full output of the previous one. Reads outside
//! the frame use border replication (the nearest in-frame pixel), so tiny
//! frames, down to 1x1, are handled without special cases.
//!
//! All arithmetic up to the gradient is integer and the remaining float
//! operations are a fixed sequence per pixel, so identical input and
//! thresholds give bit-identical masks.

pub mod gradient;
pub mod hysteresis;
pub mod nms;
pub mod smooth;

use tracing::trace;

use crate::config::EdgeThresholds;
use crate::error::Result;
use crate::types::{PixelBuffer, PixelFormat, PixelView};

pub use gradient::{Direction, Gradient};

/// Value written for edge pixels in the output mask
pub const EDGE: u8 = 255;
/// Value written for background pixels in the output mask
pub const BACKGROUND: u8 = 0;

/// Row-major scratch plane used between stages.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Copy> Plane<T> {
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Self {
        debug_assert_eq!(width * height, data.len());
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[y * self.width + x]
    }

    /// Read with border replication: out-of-frame coordinates take the
    /// value of the nearest in-frame pixel.
    #[inline]
    pub fn get_clamped(&self, x: isize, y: isize) -> T {
        let cx = x.clamp(0, self.width as isize - 1) as usize;
        let cy = y.clamp(0, self.height as isize - 1) as usize;
        self.get(cx, cy)
    }

    /// Read that yields `None` outside the frame.
    #[inline]
    pub fn get_checked(&self, x: isize, y: isize) -> Option<T> {
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            return None;
        }
        Some(self.get(x as usize, y as usize))
    }
}

/// Canny-style edge detector with fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeDetector {
    thresholds: EdgeThresholds,
    smoothing: bool,
}

impl EdgeDetector {
    pub fn new(thresholds: EdgeThresholds) -> Self {
        Self {
            thresholds,
            smoothing: true,
        }
    }

    /// Enable or skip the smoothing stage (for inputs that are already
    /// denoised).
    pub fn with_smoothing(mut self, smoothing: bool) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn thresholds(&self) -> EdgeThresholds {
        self.thresholds
    }

    /// Produce a binary mask (`0` or `255` per pixel) from a Gray8 frame.
    pub fn detect(&self, src: PixelView<'_>) -> Result<PixelBuffer> {
        src.require(PixelFormat::Gray8)?;

        let gray = Plane::from_vec(
            src.width() as usize,
            src.height() as usize,
            src.data().to_vec(),
        );
        let smoothed = if self.smoothing {
            smooth::gaussian_5x5(&gray)
        } else {
            gray
        };
        let grad = gradient::sobel(&smoothed);
        let thinned = nms::suppress(&grad);
        let mask = hysteresis::trace(&thinned, self.thresholds);

        trace!(
            width = src.width(),
            height = src.height(),
            edges = mask.data().iter().filter(|&&v| v == EDGE).count(),
            "edge detection complete"
        );

        Ok(PixelBuffer::from_parts(
            src.width(),
            src.height(),
            PixelFormat::Gray8,
            mask.into_vec(),
        ))
    }
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new(EdgeThresholds::default())
    }
}

/// Detect edges with default smoothing.
pub fn detect(src: PixelView<'_>, thresholds: EdgeThresholds) -> Result<PixelBuffer> {
    EdgeDetector::new(thresholds).detect(src)
}
