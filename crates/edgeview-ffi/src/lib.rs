//! C-compatible interface for the edgeview frame processing engine
//!
//! Lets a camera/UI host written in any language with a C FFI drive
//! [`edgeview_core::EngineSlot`] through an explicit handle.
//!
//! ## Usage from C
//!
//! ```c
//! EngineSlot *engine = edgeview_engine_new();
//!
//! // per frame, with both host buffers locked
//! int32_t status = edgeview_process_frame(
//!     engine, in_px, in_len, w, h, out_px, out_len, w, h, EDGEVIEW_MODE_EDGES);
//! if (status != 0) {
//!     log(edgeview_status_message(status));
//! }
//! double ms = edgeview_last_processing_time_ms(engine);
//!
//! edgeview_engine_free(engine);
//! ```
//!
//! ## Memory Ownership
//!
//! - `edgeview_engine_new()` allocates on the Rust heap, caller owns the handle
//! - `edgeview_engine_free()` must be called exactly once to deallocate it
//! - Frames from `edgeview_process_frame_alloc()` are owned by the caller
//!   and must be released with `edgeview_frame_free()`
//! - Status messages and the version string are static; never free them

pub mod ffi;
mod util;

pub use ffi::EdgeviewFrameC;
