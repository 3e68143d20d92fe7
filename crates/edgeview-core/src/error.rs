//! Error types for frame processing

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors reported by the engine and its host-side slot.
///
/// None of these are fatal: a rejected call leaves the output buffer and
/// the recorded timing untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// `process` was called on a slot with no engine in it
    #[error("engine not initialized")]
    NotInitialized,

    /// Null, zero-sized, wrongly sized or mismatched-dimension buffer
    #[error("invalid buffer: {0}")]
    InvalidBuffer(String),

    /// Mode code outside the defined enumeration
    #[error("unsupported processing mode: {0}")]
    UnsupportedMode(i32),

    /// Edge thresholds with `low > high`
    #[error("invalid edge thresholds: low {low} exceeds high {high}")]
    InvalidThresholds { low: u8, high: u8 },

    /// Configuration could not be parsed
    #[error("configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// Stable status code used across the C boundary.
    ///
    /// `0` is reserved for success.
    pub fn code(&self) -> i32 {
        match self {
            EngineError::NotInitialized => 1,
            EngineError::InvalidBuffer(_) => 2,
            EngineError::UnsupportedMode(_) => 3,
            EngineError::InvalidThresholds { .. } => 4,
            EngineError::Config(_) => 5,
        }
    }

    pub(crate) fn invalid_buffer(msg: impl Into<String>) -> Self {
        EngineError::InvalidBuffer(msg.into())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Config(err.to_string())
    }
}
