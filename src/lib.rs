//! Hill Climb core - trick, combo, boost and ghost replay engine
//!
//! Core modules:
//! - `sim`: Per-tick state machines (tricks, combos, boost) and the run loop
//! - `ghost`: Run recording, interpolated playback and the compressed codec
//! - `tuning`: Data-driven game balance

pub mod ghost;
pub mod sim;
pub mod tuning;

pub use ghost::{GhostFrame, GhostPlayer, GhostRecorder, GhostRun};
pub use sim::{BoostSystem, ComboSystem, RunState, TickInput, TrickDetector, tick};
pub use tuning::Tuning;

/// Engine configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz)
    pub const SIM_DT_MS: f64 = 1000.0 / 60.0;

    /// Ghost sampling interval (ms between recorded frames)
    pub const FRAME_INTERVAL_MS: u32 = 50;

    /// Largest single-tick rotation interpreted as-is; anything larger is
    /// treated as having wrapped around
    pub const DEFAULT_WRAP_THRESHOLD: f32 = std::f32::consts::PI;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Signed rotation from `previous` to `current`, taking the shorter arc.
///
/// Samples may wrap (e.g. 3.1 -> -3.1). A raw delta larger than
/// `wrap_threshold` in magnitude is folded back by one full turn, so the
/// per-tick rotation must stay below the threshold for this to be exact.
#[inline]
pub fn shortest_arc_delta(previous: f32, current: f32, wrap_threshold: f32) -> f32 {
    use std::f32::consts::TAU;
    let delta = current - previous;
    if delta > wrap_threshold {
        delta - TAU
    } else if delta < -wrap_threshold {
        delta + TAU
    } else {
        delta
    }
}

/// Round half up (toward +inf), e.g. 2.5 -> 3, -2.5 -> -2
#[inline]
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round to `decimals` places using [`round_half_up`]
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    round_half_up(value * scale) / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{PI, TAU};

    #[test]
    fn test_shortest_arc_plain_delta() {
        assert!((shortest_arc_delta(0.1, 0.3, PI) - 0.2).abs() < 1e-6);
        assert!((shortest_arc_delta(0.3, 0.1, PI) + 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_shortest_arc_wraps_forward() {
        // 3.1 -> -3.1 is a small positive step across the seam
        let d = shortest_arc_delta(3.1, -3.1, PI);
        assert!((d - (TAU - 6.2)).abs() < 1e-5);
        assert!(d > 0.0);
    }

    #[test]
    fn test_shortest_arc_wraps_backward() {
        let d = shortest_arc_delta(-3.1, 3.1, PI);
        assert!(d < 0.0);
        assert!((d + (TAU - 6.2)).abs() < 1e-5);
    }

    #[test]
    fn test_shortest_arc_custom_threshold() {
        // With a tighter threshold a 2.0 rad step is folded
        let d = shortest_arc_delta(0.0, 2.0, 1.5);
        assert!((d - (2.0 - TAU)).abs() < 1e-5);
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(-4.0) - (TAU - 4.0)).abs() < 1e-5);
        assert!(normalize_angle(3.5 * PI) < 0.0);
        assert!((normalize_angle(-0.5) + 0.5).abs() < 1e-6);
        assert!((normalize_angle(TAU + 0.25) - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(2.49), 2.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.51), -3.0);
        assert!((round_to(1.2345, 2) - 1.23).abs() < 1e-9);
        assert!((round_to(-0.004, 2) - 0.0).abs() < 1e-9);
    }
}
