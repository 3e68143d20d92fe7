//! Edgeview frame processing engine
//!
//! Real-time single-frame processing for live camera preview. Each call
//! turns one RGBA8 frame into one of three renderings and records how long
//! the conversion took.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌────────────────┐
//! │ RGBA8 frame │────▶│ FrameEngine │────▶│ RGBA8 frame    │
//! │ (host-owned)│     │ raw / gray /│     │ (engine-owned, │
//! └─────────────┘     │ edge map    │     │  moved to host)│
//!                     └─────────────┘     └────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```
//! use edgeview_core::{EngineSlot, EngineConfig, PixelBuffer, ProcessingMode};
//!
//! let slot = EngineSlot::initialized(EngineConfig::default());
//! let frame = PixelBuffer::filled(64, 48, [128, 128, 128, 255]).unwrap();
//! let mut display = vec![0u8; 64 * 48 * 4];
//!
//! let report = slot
//!     .process_into(frame.view(), &mut display, 64, 48, ProcessingMode::EdgeMap)
//!     .unwrap();
//! assert!(display.iter().step_by(4).all(|&v| v == 0));
//! assert_eq!(report.elapsed_ms, slot.last_processing_time_ms());
//! ```
//!
//! ## Ownership
//!
//! - Input frames are borrowed as [`PixelView`]; the engine never keeps them
//! - Results are [`PixelBuffer`] values owned by the caller and freed on drop
//! - [`EngineSlot::process_into`] writes into a host-owned buffer instead

pub mod color;
pub mod compose;
pub mod config;
pub mod edges;
pub mod engine;
pub mod error;
pub mod host;
pub mod logging;
pub mod stats;
pub mod types;

// Re-export main types
pub use config::{EdgeThresholds, EngineConfig};
pub use edges::EdgeDetector;
pub use engine::FrameEngine;
pub use error::{EngineError, Result};
pub use host::{EngineSlot, FrameOutcome, FrameReport};
pub use stats::FrameRateMeter;
pub use types::{PixelBuffer, PixelFormat, PixelView, ProcessingMode};
