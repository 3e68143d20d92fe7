//! Host-facing engine slot
//!
//! The camera/UI host holds one [`EngineSlot`] per preview surface. The slot
//! is either initialized (holds a [`FrameEngine`]) or not, and every call
//! takes the slot's lock for its whole duration, which serializes
//! concurrent callers.
//!
//! Host-owned output buffers are written only after the engine result is
//! complete and every check has passed; a rejected call leaves them
//! untouched.

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::engine::FrameEngine;
use crate::error::{EngineError, Result};
use crate::types::{expected_len, PixelBuffer, PixelFormat, PixelView, ProcessingMode};

/// Summary of one processed frame, for stats overlays
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub width: u32,
    pub height: u32,
    pub mode: ProcessingMode,
    /// Conversion time in milliseconds
    pub elapsed_ms: f64,
}

/// Result of a non-blocking processing attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    Processed(FrameReport),
    /// Another call held the engine; nothing was touched
    Skipped,
}

/// Lockable holder for at most one engine
#[derive(Debug, Default)]
pub struct EngineSlot {
    engine: Mutex<Option<FrameEngine>>,
}

impl EngineSlot {
    /// An uninitialized slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot already holding an engine built from `config`.
    pub fn initialized(config: EngineConfig) -> Self {
        let slot = Self::new();
        slot.initialize_with(config);
        slot
    }

    /// Install a default engine, replacing any existing one.
    pub fn initialize(&self) {
        self.initialize_with(EngineConfig::default());
    }

    pub fn initialize_with(&self, config: EngineConfig) {
        let replaced = self
            .engine
            .lock()
            .replace(FrameEngine::with_config(config))
            .is_some();
        info!(replaced, "frame engine initialized");
    }

    /// Drop the engine. Returns whether there was one.
    pub fn teardown(&self) -> bool {
        let had_engine = self.engine.lock().take().is_some();
        if had_engine {
            info!("frame engine destroyed");
        }
        had_engine
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.lock().is_some()
    }

    /// Last recorded processing time in milliseconds, `0.0` if none or
    /// if the slot is uninitialized.
    pub fn last_processing_time_ms(&self) -> f64 {
        self.engine
            .lock()
            .as_ref()
            .map(FrameEngine::last_duration_ms)
            .unwrap_or(0.0)
    }

    /// Process `input` and hand back an engine-allocated RGBA8 frame.
    pub fn process(
        &self,
        input: PixelView<'_>,
        mode: ProcessingMode,
    ) -> Result<(PixelBuffer, FrameReport)> {
        let mut guard = self.engine.lock();
        let engine = guard.as_mut().ok_or_else(not_initialized)?;
        run(engine, input, mode)
    }

    /// Process `input` into a host-owned RGBA8 buffer of
    /// `output_width x output_height`.
    ///
    /// The output must have exactly the input's dimensions; any mismatch
    /// is rejected as [`EngineError::InvalidBuffer`] instead of copying a
    /// partial frame.
    pub fn process_into(
        &self,
        input: PixelView<'_>,
        output: &mut [u8],
        output_width: u32,
        output_height: u32,
        mode: ProcessingMode,
    ) -> Result<FrameReport> {
        let mut guard = self.engine.lock();
        let engine = guard.as_mut().ok_or_else(not_initialized)?;
        run_into(engine, input, output, output_width, output_height, mode)
    }

    /// Like [`process_into`](Self::process_into) but never waits: if
    /// another call holds the engine the frame is dropped.
    pub fn try_process_into(
        &self,
        input: PixelView<'_>,
        output: &mut [u8],
        output_width: u32,
        output_height: u32,
        mode: ProcessingMode,
    ) -> Result<FrameOutcome> {
        let Some(mut guard) = self.engine.try_lock() else {
            return Ok(FrameOutcome::Skipped);
        };
        let engine = guard.as_mut().ok_or_else(not_initialized)?;
        run_into(engine, input, output, output_width, output_height, mode)
            .map(FrameOutcome::Processed)
    }
}

fn not_initialized() -> EngineError {
    warn!("processor not initialized");
    EngineError::NotInitialized
}

fn run(
    engine: &mut FrameEngine,
    input: PixelView<'_>,
    mode: ProcessingMode,
) -> Result<(PixelBuffer, FrameReport)> {
    let output = engine.process(input, mode).map_err(|e| {
        warn!(error = %e, "frame rejected");
        e
    })?;
    let report = FrameReport {
        width: output.width(),
        height: output.height(),
        mode,
        elapsed_ms: engine.last_duration_ms(),
    };
    Ok((output, report))
}

fn run_into(
    engine: &mut FrameEngine,
    input: PixelView<'_>,
    output: &mut [u8],
    output_width: u32,
    output_height: u32,
    mode: ProcessingMode,
) -> Result<FrameReport> {
    check_output(input, output.len(), output_width, output_height).map_err(|e| {
        warn!(error = %e, "output buffer rejected");
        e
    })?;

    let (frame, report) = run(engine, input, mode)?;
    output.copy_from_slice(frame.data());
    Ok(report)
}

fn check_output(
    input: PixelView<'_>,
    output_len: usize,
    output_width: u32,
    output_height: u32,
) -> Result<()> {
    if (output_width, output_height) != (input.width(), input.height()) {
        return Err(EngineError::InvalidBuffer(format!(
            "output {}x{} does not match input {}x{}",
            output_width,
            output_height,
            input.width(),
            input.height()
        )));
    }
    let expected = expected_len(output_width, output_height, PixelFormat::Rgba8);
    if expected != Some(output_len) {
        return Err(EngineError::InvalidBuffer(format!(
            "output buffer holds {} bytes, frame needs {:?}",
            output_len, expected
        )));
    }
    Ok(())
}
