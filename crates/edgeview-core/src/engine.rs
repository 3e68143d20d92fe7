//! Frame processing engine
//!
//! Owns the edge thresholds and the timing of the last completed call,
//! and runs one of three conversion chains per frame:
//!
//! ```text
//! Raw        RGBA8 ─────────────────────────────────────▶ copy
//! Grayscale  RGBA8 ─▶ to_gray ─────────────────▶ to_rgba ─▶ RGBA8
//! EdgeMap    RGBA8 ─▶ to_gray ─▶ EdgeDetector ─▶ to_rgba ─▶ RGBA8
//! ```
//!
//! The engine keeps no pixel data between calls. `process` takes
//! `&mut self`, so two calls on one engine cannot overlap; hosts that
//! share an engine across threads go through [`crate::EngineSlot`].

use std::time::{Duration, Instant};

use tracing::debug;

use crate::color;
use crate::compose;
use crate::config::{EdgeThresholds, EngineConfig};
use crate::edges::EdgeDetector;
use crate::error::Result;
use crate::types::{PixelBuffer, PixelFormat, PixelView, ProcessingMode};

/// Single-frame processing engine
#[derive(Debug)]
pub struct FrameEngine {
    config: EngineConfig,
    detector: EdgeDetector,
    /// Wall-clock time of the last completed `process` call
    last_duration: Option<Duration>,
}

impl FrameEngine {
    /// Create an engine with default thresholds (low 50, high 150).
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let detector = EdgeDetector::new(config.thresholds).with_smoothing(config.smoothing);
        debug!(
            low = config.thresholds.low(),
            high = config.thresholds.high(),
            smoothing = config.smoothing,
            "frame engine created"
        );
        Self {
            config,
            detector,
            last_duration: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn thresholds(&self) -> EdgeThresholds {
        self.config.thresholds
    }

    /// Run `input` through the chain selected by `mode`.
    ///
    /// Returns a newly allocated RGBA8 frame of the same dimensions; it
    /// never aliases `input`. On success the elapsed conversion time is
    /// recorded. A rejected input leaves the recorded time unchanged.
    pub fn process(&mut self, input: PixelView<'_>, mode: ProcessingMode) -> Result<PixelBuffer> {
        input.require(PixelFormat::Rgba8)?;

        let start = Instant::now();
        let output = match mode {
            ProcessingMode::Raw => compose::passthrough(input)?,
            ProcessingMode::Grayscale => {
                let gray = color::to_gray(input)?;
                compose::to_rgba(gray.view())?
            }
            ProcessingMode::EdgeMap => {
                let gray = color::to_gray(input)?;
                let mask = self.detector.detect(gray.view())?;
                compose::to_rgba(mask.view())?
            }
        };
        let elapsed = start.elapsed();

        self.last_duration = Some(elapsed);
        debug!(
            width = input.width(),
            height = input.height(),
            mode = mode.short_label(),
            elapsed_us = elapsed.as_micros() as u64,
            "frame processed"
        );

        Ok(output)
    }

    /// Duration of the last completed call in fractional milliseconds,
    /// `0.0` if none has completed.
    pub fn last_duration_ms(&self) -> f64 {
        self.last_duration
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }

    pub fn last_duration(&self) -> Option<Duration> {
        self.last_duration
    }
}

impl Default for FrameEngine {
    fn default() -> Self {
        Self::new()
    }
}
