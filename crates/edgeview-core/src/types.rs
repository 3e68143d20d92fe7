//! Core types for frame processing
//!
//! Pixel buffers are row-major with no padding between rows
//! (stride = width * channels). Owned buffers release their memory on drop;
//! host-owned memory is only ever borrowed through [`PixelView`].

use std::fmt;

use crate::error::{EngineError, Result};

/// Supported pixel layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub enum PixelFormat {
    /// RGBA with 8 bits per channel (32 bits per pixel)
    Rgba8 = 0,
    /// Single-channel 8-bit luminance or mask
    Gray8 = 1,
}

impl PixelFormat {
    /// Bytes per pixel
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Rgba8 => 4,
            PixelFormat::Gray8 => 1,
        }
    }
}

/// Expected byte length for a buffer of the given shape.
///
/// Returns `None` if the size does not fit in `usize`.
pub fn expected_len(width: u32, height: u32, format: PixelFormat) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(format.channels())
}

fn validate_shape(width: u32, height: u32, format: PixelFormat, len: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(EngineError::invalid_buffer(format!(
            "zero-sized frame {}x{}",
            width, height
        )));
    }
    let expected = expected_len(width, height, format)
        .ok_or_else(|| EngineError::invalid_buffer("frame dimensions overflow"))?;
    if len != expected {
        return Err(EngineError::invalid_buffer(format!(
            "{:?} frame {}x{} needs {} bytes, got {}",
            format, width, height, expected, len
        )));
    }
    Ok(())
}

/// Engine-owned pixel buffer.
///
/// Whoever holds the value owns the memory; dropping it releases the
/// pixels exactly once.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap `data` as a buffer, checking it matches `width * height * channels`.
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        validate_shape(width, height, format, data.len())?;
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Shorthand for an RGBA8 buffer.
    pub fn rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, PixelFormat::Rgba8, data)
    }

    /// Shorthand for a Gray8 buffer.
    pub fn gray(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, PixelFormat::Gray8, data)
    }

    /// RGBA8 buffer with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let pixels = expected_len(width, height, PixelFormat::Gray8)
            .ok_or_else(|| EngineError::invalid_buffer("frame dimensions overflow"))?;
        Self::rgba(width, height, rgba.repeat(pixels))
    }

    /// Internal constructor for buffers whose length is correct by construction.
    pub(crate) fn from_parts(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Self {
        debug_assert_eq!(expected_len(width, height, format), Some(data.len()));
        Self {
            width,
            height,
            format,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Give up the pixel bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Borrow the buffer as a view.
    pub fn view(&self) -> PixelView<'_> {
        PixelView {
            width: self.width,
            height: self.height,
            format: self.format,
            data: &self.data,
        }
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Borrowed pixel buffer, typically a host-owned frame locked for the
/// duration of one call.
#[derive(Debug, Clone, Copy)]
pub struct PixelView<'a> {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: &'a [u8],
}

impl<'a> PixelView<'a> {
    pub fn new(width: u32, height: u32, format: PixelFormat, data: &'a [u8]) -> Result<Self> {
        validate_shape(width, height, format, data.len())?;
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    pub fn rgba(width: u32, height: u32, data: &'a [u8]) -> Result<Self> {
        Self::new(width, height, PixelFormat::Rgba8, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Copy the pixels into an owned buffer.
    pub fn to_owned_buffer(&self) -> PixelBuffer {
        PixelBuffer::from_parts(self.width, self.height, self.format, self.data.to_vec())
    }

    pub(crate) fn require(&self, format: PixelFormat) -> Result<()> {
        if self.format != format {
            return Err(EngineError::invalid_buffer(format!(
                "expected {:?} frame, got {:?}",
                format, self.format
            )));
        }
        Ok(())
    }
}

/// Which conversion chain a frame goes through.
///
/// The integer codes are part of the binary contract with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum ProcessingMode {
    /// Byte-for-byte copy of the input
    Raw = 0,
    /// Luma replicated into R, G and B
    Grayscale = 1,
    /// Binary edge mask: edges white, background black
    #[default]
    EdgeMap = 2,
}

impl ProcessingMode {
    pub const ALL: [ProcessingMode; 3] = [
        ProcessingMode::Raw,
        ProcessingMode::Grayscale,
        ProcessingMode::EdgeMap,
    ];

    /// Boundary code for this mode.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Mode the host's toggle moves to next.
    pub fn next(self) -> Self {
        match self {
            ProcessingMode::Raw => ProcessingMode::Grayscale,
            ProcessingMode::Grayscale => ProcessingMode::EdgeMap,
            ProcessingMode::EdgeMap => ProcessingMode::Raw,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProcessingMode::Raw => "Raw Feed",
            ProcessingMode::Grayscale => "Grayscale",
            ProcessingMode::EdgeMap => "Edge Detection",
        }
    }

    /// Compact name for stats overlays.
    pub fn short_label(self) -> &'static str {
        match self {
            ProcessingMode::Raw => "Raw",
            ProcessingMode::Grayscale => "Gray",
            ProcessingMode::EdgeMap => "Edges",
        }
    }
}

impl TryFrom<i32> for ProcessingMode {
    type Error = EngineError;

    fn try_from(code: i32) -> Result<Self> {
        match code {
            0 => Ok(ProcessingMode::Raw),
            1 => Ok(ProcessingMode::Grayscale),
            2 => Ok(ProcessingMode::EdgeMap),
            other => Err(EngineError::UnsupportedMode(other)),
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
