//! Time utilities for the duel simulation

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Get current Unix timestamp in milliseconds
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}

/// Tick rate configuration
pub const SIMULATION_TPS: u32 = 60; // 60 ticks per second
pub const SNAPSHOT_TPS: u32 = 10; // 10 snapshots per second

/// Upper bound on a single simulation slice (seconds).
/// Frame hitches are clamped to this so integration error stays bounded.
pub const MAX_TICK_DELTA: f32 = 1.0 / 30.0;

/// Clamp a measured frame slice and apply the configured time scale
pub fn clamp_delta(elapsed_secs: f32, time_scale: f32) -> f32 {
    elapsed_secs.clamp(0.0, MAX_TICK_DELTA) * time_scale
}

/// Measures wall-clock slices between driver ticks
#[derive(Debug, Clone)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    /// Return the elapsed slice and restart the timer
    pub fn lap(&mut self) -> f32 {
        let elapsed = self.elapsed_secs();
        self.reset();
        elapsed
    }

    pub fn reset(&mut self) {
        self.start = Instant::now();
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_delta_bounds_hitches() {
        assert!((clamp_delta(0.5, 1.0) - MAX_TICK_DELTA).abs() < 1e-6);
        assert!((clamp_delta(0.01, 1.0) - 0.01).abs() < 1e-6);
        assert_eq!(clamp_delta(-1.0, 1.0), 0.0);
    }

    #[test]
    fn test_clamp_delta_applies_time_scale() {
        assert!((clamp_delta(0.02, 0.5) - 0.01).abs() < 1e-6);
        // Scale is applied after the clamp
        assert!((clamp_delta(1.0, 2.0) - 2.0 * MAX_TICK_DELTA).abs() < 1e-6);
    }
}
