//! C-compatible FFI interface for EngineSlot
//!
//! # Status Codes
//!
//! Every processing entry point returns an `i32` status:
//! `0` ok, `1` not initialized, `2` invalid buffer, `3` unsupported mode,
//! `4` invalid thresholds, `5` configuration error, `-1` null engine.
//! A non-zero status means the output buffer was not written.
//!
//! # Thread Safety
//!
//! A handle may be shared between threads. Calls on one handle are
//! serialized by the slot's lock.
//!
//! # Safety
//!
//! All public FFI functions check for null pointers. The caller must keep
//! buffers valid, with at least the stated length, for the whole call.

use std::os::raw::c_char;
use std::ptr;
use std::slice;

use edgeview_core::{
    logging, EngineConfig, EngineError, EngineSlot, FrameReport, PixelBuffer, PixelView,
    ProcessingMode,
};
use tracing::{error, warn};

use crate::util::{
    bytes_into_raw, cstring_new_or_fallback, free_boxed, free_bytes, free_cstring,
    ranges_overlap,
};

// Safety limits
const MAX_FRAME_SIZE: usize = 100_000_000; // 100MB max frame
const MAX_CONFIG_LEN: usize = 64 * 1024;

pub const EDGEVIEW_OK: i32 = 0;
pub const EDGEVIEW_ERR_NULL_ENGINE: i32 = -1;

pub const EDGEVIEW_MODE_RAW: i32 = 0;
pub const EDGEVIEW_MODE_GRAY: i32 = 1;
pub const EDGEVIEW_MODE_EDGES: i32 = 2;

/// Engine-allocated RGBA8 frame returned to C
#[repr(C)]
pub struct EdgeviewFrameC {
    /// Status code, `0` on success
    pub status: i32,
    /// Error message if status is non-zero (owned, freed by `edgeview_frame_free`)
    pub error_msg: *mut c_char,
    /// Pixel data (owned, freed by `edgeview_frame_free`)
    pub data: *mut u8,
    /// Length of `data` in bytes
    pub len: usize,
    pub width: u32,
    pub height: u32,
}

impl EdgeviewFrameC {
    fn success(frame: PixelBuffer) -> Self {
        let (width, height) = (frame.width(), frame.height());
        let (data, len) = bytes_into_raw(frame.into_data());
        Self {
            status: EDGEVIEW_OK,
            error_msg: ptr::null_mut(),
            data,
            len,
            width,
            height,
        }
    }

    fn error(status: i32, msg: &str) -> Self {
        Self {
            status,
            error_msg: cstring_new_or_fallback(msg, "edgeview error"),
            data: ptr::null_mut(),
            len: 0,
            width: 0,
            height: 0,
        }
    }

    fn from_engine_error(err: &EngineError) -> Self {
        Self::error(err.code(), &err.to_string())
    }
}

// ============================================================================
// Engine Lifecycle
// ============================================================================

/// Install a `tracing` subscriber honouring `RUST_LOG`. Safe to call more
/// than once.
#[no_mangle]
pub extern "C" fn edgeview_init_logging() {
    logging::init();
}

/// Create an initialized engine with default thresholds (50, 150).
///
/// Caller owns the handle and must call `edgeview_engine_free`.
#[no_mangle]
pub extern "C" fn edgeview_engine_new() -> *mut EngineSlot {
    Box::into_raw(Box::new(EngineSlot::initialized(EngineConfig::default())))
}

/// Create an initialized engine from a JSON configuration such as
/// `{"thresholds": {"low": 30, "high": 90}, "smoothing": true}`.
///
/// Returns NULL if `config_json` is NULL, not UTF-8, too long or invalid.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn edgeview_engine_new_with_config(config_json: *const c_char) -> *mut EngineSlot {
    if config_json.is_null() {
        return ptr::null_mut();
    }

    let json = match unsafe { std::ffi::CStr::from_ptr(config_json) }.to_str() {
        Ok(s) if s.len() <= MAX_CONFIG_LEN => s,
        Ok(_) => {
            error!("engine config exceeds {} bytes", MAX_CONFIG_LEN);
            return ptr::null_mut();
        }
        Err(_) => {
            error!("engine config is not valid UTF-8");
            return ptr::null_mut();
        }
    };

    match EngineConfig::from_json(json) {
        Ok(config) => Box::into_raw(Box::new(EngineSlot::initialized(config))),
        Err(e) => {
            error!(error = %e, "failed to create engine");
            ptr::null_mut()
        }
    }
}

/// Replace the engine inside the handle with a fresh default one.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn edgeview_engine_initialize(engine: *const EngineSlot) -> i32 {
    let Some(slot) = (unsafe { engine.as_ref() }) else {
        return EDGEVIEW_ERR_NULL_ENGINE;
    };
    slot.initialize();
    EDGEVIEW_OK
}

/// Release the engine but keep the handle. Later frames report
/// "not initialized" until `edgeview_engine_initialize` is called.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn edgeview_engine_teardown(engine: *const EngineSlot) -> i32 {
    let Some(slot) = (unsafe { engine.as_ref() }) else {
        return EDGEVIEW_ERR_NULL_ENGINE;
    };
    slot.teardown();
    EDGEVIEW_OK
}

/// Free a handle from `edgeview_engine_new*`. NULL is ignored.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn edgeview_engine_free(engine: *mut EngineSlot) {
    unsafe { free_boxed(engine) };
}

// ============================================================================
// Frame Processing
// ============================================================================

fn ensure_initialized(slot: &EngineSlot) -> Result<(), EngineError> {
    if !slot.is_initialized() {
        warn!("processor not initialized");
        return Err(EngineError::NotInitialized);
    }
    Ok(())
}

fn parse_mode(mode: i32) -> Result<ProcessingMode, EngineError> {
    ProcessingMode::try_from(mode).map_err(|e| {
        warn!(mode, "unsupported processing mode");
        e
    })
}

/// Borrow a host input frame.
///
/// # Safety
/// `data` must be valid for `len` bytes for the lifetime `'a`.
unsafe fn input_view<'a>(
    data: *const u8,
    len: usize,
    width: u32,
    height: u32,
) -> Result<PixelView<'a>, EngineError> {
    if data.is_null() {
        return Err(EngineError::InvalidBuffer("null input buffer".into()));
    }
    if len > MAX_FRAME_SIZE {
        return Err(EngineError::InvalidBuffer(
            "frame size exceeds maximum".into(),
        ));
    }
    let bytes = unsafe { slice::from_raw_parts(data, len) };
    PixelView::rgba(width, height, bytes)
}

/// Validate both host buffers and run the frame.
///
/// # Safety
/// `input` must be valid for `input_len` bytes and `output` for
/// `output_len` bytes, for the duration of the call.
#[allow(clippy::too_many_arguments)]
unsafe fn process_host_frame(
    slot: &EngineSlot,
    input: *const u8,
    input_len: usize,
    input_width: u32,
    input_height: u32,
    output: *mut u8,
    output_len: usize,
    output_width: u32,
    output_height: u32,
    mode: i32,
) -> Result<FrameReport, EngineError> {
    ensure_initialized(slot)?;
    let mode = parse_mode(mode)?;
    let view = unsafe { input_view(input, input_len, input_width, input_height) }?;

    if output.is_null() {
        return Err(EngineError::InvalidBuffer("null output buffer".into()));
    }
    if output_len > MAX_FRAME_SIZE {
        return Err(EngineError::InvalidBuffer(
            "output size exceeds maximum".into(),
        ));
    }
    if ranges_overlap(input, input_len, output, output_len) {
        return Err(EngineError::InvalidBuffer(
            "input and output buffers overlap".into(),
        ));
    }
    let out = unsafe { slice::from_raw_parts_mut(output, output_len) };

    slot.process_into(view, out, output_width, output_height, mode)
}

/// Process one host frame into a host display buffer.
///
/// # Arguments
/// - `engine`: handle from `edgeview_engine_new*`
/// - `input`, `input_len`, `input_width`, `input_height`: read-locked RGBA8 frame
/// - `output`, `output_len`, `output_width`, `output_height`: write-locked RGBA8 frame
/// - `mode`: 0=Raw, 1=Grayscale, 2=EdgeMap
///
/// Output dimensions must equal input dimensions and the buffers must not
/// overlap. On any non-zero status the output is left untouched.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref, clippy::too_many_arguments)]
pub extern "C" fn edgeview_process_frame(
    engine: *const EngineSlot,
    input: *const u8,
    input_len: usize,
    input_width: u32,
    input_height: u32,
    output: *mut u8,
    output_len: usize,
    output_width: u32,
    output_height: u32,
    mode: i32,
) -> i32 {
    let Some(slot) = (unsafe { engine.as_ref() }) else {
        return EDGEVIEW_ERR_NULL_ENGINE;
    };

    let result = unsafe {
        process_host_frame(
            slot,
            input,
            input_len,
            input_width,
            input_height,
            output,
            output_len,
            output_width,
            output_height,
            mode,
        )
    };

    match result {
        Ok(_) => EDGEVIEW_OK,
        Err(e) => {
            warn!(error = %e, "frame not processed");
            e.code()
        }
    }
}

/// Process one host frame into a new engine-allocated RGBA8 frame.
///
/// The caller owns the result and must pass it to `edgeview_frame_free`
/// exactly once, whatever its status.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn edgeview_process_frame_alloc(
    engine: *const EngineSlot,
    input: *const u8,
    input_len: usize,
    width: u32,
    height: u32,
    mode: i32,
) -> EdgeviewFrameC {
    let Some(slot) = (unsafe { engine.as_ref() }) else {
        return EdgeviewFrameC::error(EDGEVIEW_ERR_NULL_ENGINE, "null engine pointer");
    };

    let result = ensure_initialized(slot)
        .and_then(|_| parse_mode(mode))
        .and_then(|mode| {
            let view = unsafe { input_view(input, input_len, width, height) }?;
            slot.process(view, mode)
        });

    match result {
        Ok((frame, _)) => EdgeviewFrameC::success(frame),
        Err(e) => EdgeviewFrameC::from_engine_error(&e),
    }
}

/// Free an `EdgeviewFrameC` and everything it owns.
///
/// # Safety
/// - `frame` must come from `edgeview_process_frame_alloc`
/// - `frame` must not be used after this call
#[no_mangle]
pub extern "C" fn edgeview_frame_free(frame: EdgeviewFrameC) {
    unsafe {
        free_cstring(frame.error_msg);
        free_bytes(frame.data, frame.len);
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Duration of the last completed frame in milliseconds; `0.0` for a NULL
/// or uninitialized handle, or before the first frame.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn edgeview_last_processing_time_ms(engine: *const EngineSlot) -> f64 {
    match unsafe { engine.as_ref() } {
        Some(slot) => slot.last_processing_time_ms(),
        None => 0.0,
    }
}

/// Static description of a status code. Never free the result.
#[no_mangle]
pub extern "C" fn edgeview_status_message(status: i32) -> *const c_char {
    let msg: &'static str = match status {
        EDGEVIEW_OK => "ok\0",
        EDGEVIEW_ERR_NULL_ENGINE => "null engine pointer\0",
        1 => "engine not initialized\0",
        2 => "invalid buffer\0",
        3 => "unsupported processing mode\0",
        4 => "invalid edge thresholds\0",
        5 => "configuration error\0",
        _ => "unknown status\0",
    };
    msg.as_ptr() as *const c_char
}

/// Library version as a static C string.
#[no_mangle]
pub extern "C" fn edgeview_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::{CStr, CString};

    fn gray_frame(width: u32, height: u32, v: u8) -> Vec<u8> {
        [v, v, v, 255].repeat((width * height) as usize)
    }

    #[test]
    fn test_engine_lifecycle() {
        let engine = edgeview_engine_new();
        assert!(!engine.is_null());
        assert_eq!(edgeview_last_processing_time_ms(engine), 0.0);
        edgeview_engine_free(engine);
        edgeview_engine_free(ptr::null_mut());
    }

    #[test]
    fn test_null_engine_handling() {
        let mut out = vec![0u8; 4];
        let status = edgeview_process_frame(
            ptr::null(),
            ptr::null(),
            0,
            1,
            1,
            out.as_mut_ptr(),
            out.len(),
            1,
            1,
            EDGEVIEW_MODE_RAW,
        );
        assert_eq!(status, EDGEVIEW_ERR_NULL_ENGINE);
        assert_eq!(edgeview_last_processing_time_ms(ptr::null()), 0.0);
        assert_eq!(edgeview_engine_teardown(ptr::null()), EDGEVIEW_ERR_NULL_ENGINE);
    }

    #[test]
    fn test_process_frame_grayscale() {
        let engine = edgeview_engine_new();
        let mut input = Vec::new();
        input.extend_from_slice(&[255, 0, 0, 255, 0, 255, 0, 255]);
        let mut out = vec![0u8; 8];

        let status = edgeview_process_frame(
            engine,
            input.as_ptr(),
            input.len(),
            2,
            1,
            out.as_mut_ptr(),
            out.len(),
            2,
            1,
            EDGEVIEW_MODE_GRAY,
        );
        assert_eq!(status, EDGEVIEW_OK);
        assert_eq!(out, vec![76, 76, 76, 255, 150, 150, 150, 255]);
        assert!(edgeview_last_processing_time_ms(engine) >= 0.0);

        edgeview_engine_free(engine);
    }

    #[test]
    fn test_teardown_then_process() {
        let engine = edgeview_engine_new();
        let input = gray_frame(2, 2, 10);
        let mut out = vec![42u8; 16];

        assert_eq!(edgeview_engine_teardown(engine), EDGEVIEW_OK);
        let status = edgeview_process_frame(
            engine,
            input.as_ptr(),
            input.len(),
            2,
            2,
            out.as_mut_ptr(),
            out.len(),
            2,
            2,
            EDGEVIEW_MODE_EDGES,
        );
        assert_eq!(status, EngineError::NotInitialized.code());
        assert!(out.iter().all(|&b| b == 42));
        assert_eq!(edgeview_last_processing_time_ms(engine), 0.0);

        assert_eq!(edgeview_engine_initialize(engine), EDGEVIEW_OK);
        let status = edgeview_process_frame(
            engine,
            input.as_ptr(),
            input.len(),
            2,
            2,
            out.as_mut_ptr(),
            out.len(),
            2,
            2,
            EDGEVIEW_MODE_RAW,
        );
        assert_eq!(status, EDGEVIEW_OK);
        assert_eq!(out, input);

        edgeview_engine_free(engine);
    }

    #[test]
    fn test_rejects_bad_mode_and_mismatch() {
        let engine = edgeview_engine_new();
        let input = gray_frame(4, 2, 0);
        let mut out = vec![1u8; 32];

        let bad_mode = edgeview_process_frame(
            engine,
            input.as_ptr(),
            input.len(),
            4,
            2,
            out.as_mut_ptr(),
            out.len(),
            4,
            2,
            7,
        );
        assert_eq!(bad_mode, 3);

        let mismatch = edgeview_process_frame(
            engine,
            input.as_ptr(),
            input.len(),
            4,
            2,
            out.as_mut_ptr(),
            out.len(),
            2,
            4,
            EDGEVIEW_MODE_RAW,
        );
        assert_eq!(mismatch, 2);

        let short_input = edgeview_process_frame(
            engine,
            input.as_ptr(),
            input.len() - 1,
            4,
            2,
            out.as_mut_ptr(),
            out.len(),
            4,
            2,
            EDGEVIEW_MODE_RAW,
        );
        assert_eq!(short_input, 2);
        assert!(out.iter().all(|&b| b == 1));

        edgeview_engine_free(engine);
    }

    #[test]
    fn test_rejects_overlapping_buffers() {
        let engine = edgeview_engine_new();
        let mut buf = gray_frame(2, 2, 5);
        let ptr = buf.as_mut_ptr();

        let status = edgeview_process_frame(
            engine,
            ptr,
            buf.len(),
            2,
            2,
            ptr,
            buf.len(),
            2,
            2,
            EDGEVIEW_MODE_GRAY,
        );
        assert_eq!(status, 2);

        edgeview_engine_free(engine);
    }

    #[test]
    fn test_process_frame_alloc() {
        let engine = edgeview_engine_new();
        let input = gray_frame(8, 6, 128);

        let frame = edgeview_process_frame_alloc(
            engine,
            input.as_ptr(),
            input.len(),
            8,
            6,
            EDGEVIEW_MODE_EDGES,
        );
        assert_eq!(frame.status, EDGEVIEW_OK);
        assert!(frame.error_msg.is_null());
        assert_eq!((frame.width, frame.height, frame.len), (8, 6, 8 * 6 * 4));
        let data = unsafe { slice::from_raw_parts(frame.data, frame.len) };
        assert!(data.chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
        assert_ne!(frame.data as *const u8, input.as_ptr());
        edgeview_frame_free(frame);

        let failed = edgeview_process_frame_alloc(engine, ptr::null(), 0, 8, 6, 0);
        assert_eq!(failed.status, 2);
        assert!(failed.data.is_null());
        let msg = unsafe { CStr::from_ptr(failed.error_msg) }.to_str().unwrap();
        assert!(msg.contains("null input"));
        edgeview_frame_free(failed);

        edgeview_engine_free(engine);
    }

    #[test]
    fn test_new_with_config() {
        let json = CString::new(r#"{"thresholds": {"low": 10, "high": 20}}"#).unwrap();
        let engine = edgeview_engine_new_with_config(json.as_ptr());
        assert!(!engine.is_null());
        edgeview_engine_free(engine);

        let bad = CString::new(r#"{"thresholds": {"low": 30, "high": 20}}"#).unwrap();
        assert!(edgeview_engine_new_with_config(bad.as_ptr()).is_null());
        assert!(edgeview_engine_new_with_config(ptr::null()).is_null());
    }

    #[test]
    fn test_status_messages() {
        let msg = |code| {
            unsafe { CStr::from_ptr(edgeview_status_message(code)) }
                .to_str()
                .unwrap()
        };
        assert_eq!(msg(0), "ok");
        assert_eq!(msg(1), "engine not initialized");
        assert_eq!(msg(-1), "null engine pointer");
        assert_eq!(msg(99), "unknown status");
    }

    #[test]
    fn test_version() {
        let version = unsafe { CStr::from_ptr(edgeview_version()) }.to_str().unwrap();
        assert_eq!(version, env!("CARGO_PKG_VERSION"));
    }
}
