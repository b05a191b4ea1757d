//! Timing profiles for spin choreography

use serde::{Deserialize, Serialize};

/// Timing profile selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimingProfile {
    /// Normal gameplay timing
    Normal,
    /// Fast/Turbo mode
    Turbo,
    /// Custom (produced by `scaled`)
    Custom,
}

impl Default for TimingProfile {
    fn default() -> Self {
        Self::Normal
    }
}

/// Spin choreography constants
///
/// All durations are milliseconds on the session clock. Stop deadlines are
/// staggered per column: `base_stop_ms + column * stop_increment_ms`, which
/// gives the left-to-right settle cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinTiming {
    /// Profile type
    pub profile: TimingProfile,

    /// Pre-roll anticipation duration (Accelerating phase)
    pub pre_roll_ms: f64,

    /// Pre-roll dip depth, in row units (applied against scroll direction)
    pub pre_roll_offset_rows: f64,

    /// Scroll speed while Spinning, in rows per second
    pub rows_per_sec: f64,

    /// First column's stop deadline
    pub base_stop_ms: f64,

    /// Extra delay per subsequent column
    pub stop_increment_ms: f64,

    /// Row-alignment ease duration (Decelerating phase)
    pub decel_ms: f64,

    /// Overshoot/settle duration (Bouncing phase)
    pub bounce_ms: f64,

    /// Overshoot depth, in row units
    pub bounce_offset_rows: f64,

    /// Generous upper bound after which an unsettled spin cycle is failed
    pub settle_timeout_ms: f64,

    /// Whether "stop all" interactions may skip Spinning early
    pub allow_force_stop: bool,
}

impl SpinTiming {
    /// Normal gameplay timing
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            pre_roll_ms: 120.0,
            pre_roll_offset_rows: 0.35,
            rows_per_sec: 14.0,
            base_stop_ms: 1000.0,
            stop_increment_ms: 300.0,
            decel_ms: 90.0,
            bounce_ms: 160.0,
            bounce_offset_rows: 0.18,
            settle_timeout_ms: 15_000.0,
            allow_force_stop: false,
        }
    }

    /// Turbo mode
    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            pre_roll_ms: 60.0,
            pre_roll_offset_rows: 0.25,
            rows_per_sec: 24.0,
            base_stop_ms: 400.0,
            stop_increment_ms: 100.0,
            decel_ms: 50.0,
            bounce_ms: 80.0,
            bounce_offset_rows: 0.12,
            settle_timeout_ms: 8_000.0,
            allow_force_stop: true,
        }
    }

    /// Scale all durations by `factor` (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            profile: TimingProfile::Custom,
            pre_roll_ms: self.pre_roll_ms * factor,
            pre_roll_offset_rows: self.pre_roll_offset_rows,
            rows_per_sec: self.rows_per_sec / factor.max(f64::EPSILON),
            base_stop_ms: self.base_stop_ms * factor,
            stop_increment_ms: self.stop_increment_ms * factor,
            decel_ms: self.decel_ms * factor,
            bounce_ms: self.bounce_ms * factor,
            bounce_offset_rows: self.bounce_offset_rows,
            settle_timeout_ms: self.settle_timeout_ms * factor,
            allow_force_stop: self.allow_force_stop,
        }
    }

    /// Stop deadline for a column index
    pub fn stop_deadline(&self, column: u8) -> f64 {
        self.base_stop_ms + column as f64 * self.stop_increment_ms
    }

    /// Time until the last column's natural settle
    pub fn total_spin_duration(&self, columns: u8) -> f64 {
        self.stop_deadline(columns.saturating_sub(1)) + self.decel_ms + self.bounce_ms
    }
}

impl Default for SpinTiming {
    fn default() -> Self {
        Self::normal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles() {
        let normal = SpinTiming::normal();
        let turbo = SpinTiming::turbo();
        assert!(turbo.base_stop_ms < normal.base_stop_ms);
        assert!(turbo.rows_per_sec > normal.rows_per_sec);
    }

    #[test]
    fn test_stop_deadlines_strictly_increase() {
        let timing = SpinTiming::normal();
        for col in 0..6u8 {
            assert!(timing.stop_deadline(col + 1) > timing.stop_deadline(col));
        }
        assert_eq!(timing.stop_deadline(0), 1000.0);
        assert_eq!(timing.stop_deadline(3), 1900.0);
    }

    #[test]
    fn test_scaled_halves_durations() {
        let half = SpinTiming::normal().scaled(0.5);
        assert_eq!(half.profile, TimingProfile::Custom);
        assert_eq!(half.base_stop_ms, 500.0);
        assert_eq!(half.stop_increment_ms, 150.0);
    }

    #[test]
    fn test_total_duration_covers_last_column() {
        let timing = SpinTiming::normal();
        let total = timing.total_spin_duration(5);
        assert!(total > timing.stop_deadline(4));
        assert!(total < timing.settle_timeout_ms);
    }
}
