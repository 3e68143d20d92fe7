//! Rolling frame-rate measurement for preview overlays

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Default number of frame intervals averaged
pub const DEFAULT_WINDOW: usize = 30;

/// Averages the last `window` intervals between displayed frames.
#[derive(Debug, Clone)]
pub struct FrameRateMeter {
    window: usize,
    intervals: VecDeque<Duration>,
    last_frame: Option<Instant>,
}

impl FrameRateMeter {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            intervals: VecDeque::with_capacity(window + 1),
            last_frame: None,
        }
    }

    /// Record a frame displayed now.
    pub fn record_frame(&mut self) {
        self.record_frame_at(Instant::now());
    }

    /// Record a frame displayed at `now`. The first frame only sets the
    /// reference point.
    pub fn record_frame_at(&mut self, now: Instant) {
        if let Some(last) = self.last_frame {
            self.intervals.push_back(now.saturating_duration_since(last));
            if self.intervals.len() > self.window {
                self.intervals.pop_front();
            }
        }
        self.last_frame = Some(now);
    }

    fn mean_interval_secs(&self) -> Option<f64> {
        if self.intervals.is_empty() {
            return None;
        }
        let total: Duration = self.intervals.iter().sum();
        Some(total.as_secs_f64() / self.intervals.len() as f64)
    }

    /// Frames per second over the window, `0.0` before two frames.
    pub fn fps(&self) -> f64 {
        match self.mean_interval_secs() {
            Some(mean) if mean > 0.0 => 1.0 / mean,
            _ => 0.0,
        }
    }

    /// Mean interval between frames in milliseconds, `0.0` before two frames.
    pub fn average_frame_time_ms(&self) -> f64 {
        self.mean_interval_secs()
            .map(|mean| mean * 1000.0)
            .unwrap_or(0.0)
    }

    pub fn reset(&mut self) {
        self.intervals.clear();
        self.last_frame = None;
    }

    pub fn samples(&self) -> usize {
        self.intervals.len()
    }
}

impl Default for FrameRateMeter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_meter() {
        let mut meter = FrameRateMeter::default();
        assert_eq!(meter.fps(), 0.0);
        meter.record_frame();
        assert_eq!(meter.fps(), 0.0);
        assert_eq!(meter.average_frame_time_ms(), 0.0);
    }

    #[test]
    fn test_steady_rate() {
        let mut meter = FrameRateMeter::new(10);
        let t0 = Instant::now();
        for i in 0..5 {
            meter.record_frame_at(t0 + Duration::from_millis(20 * i));
        }
        assert_eq!(meter.samples(), 4);
        assert!((meter.fps() - 50.0).abs() < 1e-9);
        assert!((meter.average_frame_time_ms() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_evicts_oldest() {
        let mut meter = FrameRateMeter::new(2);
        let t0 = Instant::now();
        meter.record_frame_at(t0);
        meter.record_frame_at(t0 + Duration::from_millis(100));
        meter.record_frame_at(t0 + Duration::from_millis(110));
        meter.record_frame_at(t0 + Duration::from_millis(120));
        assert_eq!(meter.samples(), 2);
        assert!((meter.average_frame_time_ms() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset() {
        let mut meter = FrameRateMeter::new(4);
        let t0 = Instant::now();
        meter.record_frame_at(t0);
        meter.record_frame_at(t0 + Duration::from_millis(5));
        meter.reset();
        assert_eq!(meter.samples(), 0);
        meter.record_frame_at(t0 + Duration::from_millis(50));
        assert_eq!(meter.samples(), 0);
    }
}
