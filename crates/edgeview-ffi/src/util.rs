//! Allocation helpers shared by the C entry points
//!
//! Every pointer handed to C from here is released by the matching
//! `free_*` function; all of them treat NULL as a no-op.

use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Convert a message to an owned C string, using `fallback` if `s`
/// contains interior NUL bytes.
pub fn cstring_new_or_fallback(s: &str, fallback: &'static str) -> *mut c_char {
    CString::new(s)
        .or_else(|_| CString::new(fallback))
        .unwrap_or_default()
        .into_raw()
}

/// # Safety
/// `ptr` must come from `CString::into_raw` or be null.
pub unsafe fn free_cstring(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            drop(CString::from_raw(ptr));
        }
    }
}

/// # Safety
/// `ptr` must come from `Box::into_raw` or be null.
pub unsafe fn free_boxed<T>(ptr: *mut T) {
    if !ptr.is_null() {
        unsafe {
            drop(Box::from_raw(ptr));
        }
    }
}

/// Hand a byte vector to C as pointer + length. Empty vectors become NULL.
pub fn bytes_into_raw(bytes: Vec<u8>) -> (*mut u8, usize) {
    let len = bytes.len();
    if len == 0 {
        return (ptr::null_mut(), 0);
    }
    (Box::into_raw(bytes.into_boxed_slice()) as *mut u8, len)
}

/// # Safety
/// `ptr`/`len` must come from [`bytes_into_raw`], or `ptr` must be null.
pub unsafe fn free_bytes(ptr: *mut u8, len: usize) {
    if !ptr.is_null() && len > 0 {
        unsafe {
            drop(Box::from_raw(ptr::slice_from_raw_parts_mut(ptr, len)));
        }
    }
}

/// Whether two byte ranges share any memory.
pub fn ranges_overlap(a: *const u8, a_len: usize, b: *const u8, b_len: usize) -> bool {
    let (a, b) = (a as usize, b as usize);
    a < b.saturating_add(b_len) && b < a.saturating_add(a_len)
}
