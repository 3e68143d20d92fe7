//! Engine configuration

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Default lower hysteresis threshold
pub const DEFAULT_LOW_THRESHOLD: u8 = 50;
/// Default upper hysteresis threshold
pub const DEFAULT_HIGH_THRESHOLD: u8 = 150;

#[derive(Deserialize)]
struct RawThresholds {
    low: u8,
    high: u8,
}

/// Hysteresis thresholds, compared against gradient magnitude.
///
/// Invariant: `low <= high`. The fields are private so the only way to
/// build one is through [`EdgeThresholds::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawThresholds")]
pub struct EdgeThresholds {
    low: u8,
    high: u8,
}

impl EdgeThresholds {
    pub fn new(low: u8, high: u8) -> Result<Self> {
        if low > high {
            return Err(EngineError::InvalidThresholds { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> u8 {
        self.low
    }

    pub fn high(&self) -> u8 {
        self.high
    }
}

impl Default for EdgeThresholds {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW_THRESHOLD,
            high: DEFAULT_HIGH_THRESHOLD,
        }
    }
}

impl TryFrom<RawThresholds> for EdgeThresholds {
    type Error = EngineError;

    fn try_from(raw: RawThresholds) -> Result<Self> {
        Self::new(raw.low, raw.high)
    }
}

/// Configuration fixed at engine construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Edge tracing thresholds
    #[serde(default)]
    pub thresholds: EdgeThresholds,
    /// Run the Gaussian smoothing stage before gradient estimation
    #[serde(default = "default_smoothing")]
    pub smoothing: bool,
}

fn default_smoothing() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            thresholds: EdgeThresholds::default(),
            smoothing: default_smoothing(),
        }
    }
}

impl EngineConfig {
    /// Parse a JSON configuration. Missing fields take their defaults.
    ///
    /// ```
    /// use edgeview_core::EngineConfig;
    ///
    /// let config = EngineConfig::from_json(r#"{"thresholds": {"low": 20, "high": 90}}"#).unwrap();
    /// assert_eq!(config.thresholds.low(), 20);
    /// assert!(config.smoothing);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_thresholds(mut self, thresholds: EdgeThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}
