//! Trick detection
//!
//! Watches the car's angle while airborne, counts completed rotations across
//! the angle wraparound, and scores everything on landing.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::shortest_arc_delta;
use crate::tuning::TrickConfig;

/// Trick types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrickKind {
    /// Part of the wire vocabulary; the detector always scores a direction
    Flip,
    Backflip,
    Frontflip,
    DoubleFlip,
    AirTime,
    PerfectLanding,
}

impl TrickKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrickKind::Flip => "flip",
            TrickKind::Backflip => "backflip",
            TrickKind::Frontflip => "frontflip",
            TrickKind::DoubleFlip => "doubleFlip",
            TrickKind::AirTime => "airTime",
            TrickKind::PerfectLanding => "perfectLanding",
        }
    }
}

/// A scored trick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trick {
    pub kind: TrickKind,
    /// Point value before any combo multiplier
    pub value: u32,
    /// Display label
    pub label: String,
    /// Time the trick was detected (ms)
    pub timestamp: f64,
}

impl Trick {
    fn new(kind: TrickKind, value: u32, label: impl Into<String>, timestamp: f64) -> Self {
        Self {
            kind,
            value,
            label: label.into(),
            timestamp,
        }
    }
}

/// Detector state (also the HUD snapshot)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrickState {
    pub is_airborne: bool,
    /// Time the current jump started (ms)
    pub airborne_start_time: f64,
    /// Seconds airborne in the current jump
    pub current_air_time: f32,
    /// Net signed rotation since takeoff (rad, not wrapped)
    pub total_rotation: f32,
    /// Last raw angle sample
    pub previous_angle: f32,
    /// Full turns completed this jump
    pub flips_completed: u32,
    /// Detected mid-air, scored on landing
    pub pending_tricks: Vec<Trick>,
    /// Landed tricks still on screen
    pub recent_tricks: Vec<Trick>,
    /// Cumulative for the run
    pub total_trick_points: u64,
}

/// Per-tick trick detector
#[derive(Debug, Clone, Default)]
pub struct TrickDetector {
    config: TrickConfig,
    state: TrickState,
    /// Angle at takeoff
    start_angle: f32,
}

impl TrickDetector {
    pub fn new(config: TrickConfig) -> Self {
        Self {
            config,
            state: TrickState::default(),
            start_angle: 0.0,
        }
    }

    /// Feed one physics sample. Returns the tricks scored this tick, which is
    /// empty except on the landing tick.
    pub fn update(
        &mut self,
        is_grounded: bool,
        car_angle: f32,
        car_velocity_y: f32,
        current_time: f64,
    ) -> Vec<Trick> {
        match (self.state.is_airborne, is_grounded) {
            (false, false) => {
                self.take_off(car_angle, current_time);
                Vec::new()
            }
            (true, false) => {
                self.track_rotation(car_angle, current_time);
                Vec::new()
            }
            (true, true) => self.land(car_velocity_y, current_time),
            (false, true) => Vec::new(),
        }
    }

    fn take_off(&mut self, car_angle: f32, current_time: f64) {
        let s = &mut self.state;
        s.is_airborne = true;
        s.airborne_start_time = current_time;
        s.current_air_time = 0.0;
        s.total_rotation = 0.0;
        s.previous_angle = car_angle;
        s.flips_completed = 0;
        s.pending_tricks.clear();
        self.start_angle = car_angle;
    }

    fn track_rotation(&mut self, car_angle: f32, current_time: f64) {
        let delta = shortest_arc_delta(
            self.state.previous_angle,
            car_angle,
            self.config.wrap_threshold,
        );
        self.state.total_rotation += delta;
        self.state.previous_angle = car_angle;
        self.state.current_air_time =
            ((current_time - self.state.airborne_start_time) / 1000.0) as f32;

        let new_flips = (self.state.total_rotation.abs() / TAU).floor() as u32;
        // Every increment crossed this tick shares the sign of the running total
        while self.state.flips_completed < new_flips {
            self.state.flips_completed += 1;
            let trick = self.flip_trick(self.state.flips_completed, current_time);
            log::debug!(
                "{} detected ({} flips, rotation {:.2} rad)",
                trick.label,
                self.state.flips_completed,
                self.state.total_rotation
            );
            self.state.pending_tricks.push(trick);
        }
    }

    fn flip_trick(&self, flip_count: u32, current_time: f64) -> Trick {
        let cfg = &self.config;
        if flip_count >= 2 {
            Trick::new(
                TrickKind::DoubleFlip,
                cfg.double_flip_points,
                "Double Flip!",
                current_time,
            )
        } else if self.state.total_rotation < 0.0 {
            Trick::new(
                TrickKind::Backflip,
                cfg.backflip_points(),
                "Backflip!",
                current_time,
            )
        } else {
            Trick::new(
                TrickKind::Frontflip,
                cfg.frontflip_points(),
                "Frontflip!",
                current_time,
            )
        }
    }

    fn land(&mut self, car_velocity_y: f32, current_time: f64) -> Vec<Trick> {
        let cfg = &self.config;
        let air_secs = (current_time - self.state.airborne_start_time) / 1000.0;
        let air_time = air_secs as f32;
        self.state.current_air_time = air_time;

        let mut landed = std::mem::take(&mut self.state.pending_tricks);

        if air_secs >= cfg.min_air_time_for_bonus as f64 {
            let points = crate::round_half_up(air_secs * cfg.air_time_points_per_second as f64);
            landed.push(Trick::new(
                TrickKind::AirTime,
                points as u32,
                format!("Air Time {:.1}s", air_time),
                current_time,
            ));
        }

        if car_velocity_y.abs() < cfg.perfect_landing_max_velocity
            && self.state.flips_completed > 0
        {
            landed.push(Trick::new(
                TrickKind::PerfectLanding,
                cfg.perfect_landing_points,
                "Perfect Landing!",
                current_time,
            ));
        }

        for trick in &landed {
            self.state.total_trick_points += trick.value as u64;
        }
        self.state.recent_tricks.extend(landed.iter().cloned());

        if !landed.is_empty() {
            log::debug!(
                "Landed {} trick(s) after {:.2}s, net rotation {:.2} rad from {:.2}",
                landed.len(),
                air_time,
                self.state.total_rotation,
                self.start_angle
            );
        }

        let s = &mut self.state;
        s.is_airborne = false;
        s.airborne_start_time = 0.0;
        s.current_air_time = 0.0;
        s.total_rotation = 0.0;
        s.flips_completed = 0;
        self.start_angle = 0.0;

        landed
    }

    /// Drop recent tricks older than the display duration
    pub fn clear_old_tricks(&mut self, current_time: f64) {
        let max_age = self.config.trick_display_duration_ms;
        self.state
            .recent_tricks
            .retain(|t| current_time - t.timestamp <= max_age);
    }

    /// Zero everything, including run points
    pub fn reset(&mut self) {
        self.state = TrickState::default();
        self.start_angle = 0.0;
    }

    pub fn state(&self) -> TrickState {
        self.state.clone()
    }

    pub fn is_airborne(&self) -> bool {
        self.state.is_airborne
    }

    pub fn total_trick_points(&self) -> u64 {
        self.state.total_trick_points
    }

    pub fn recent_tricks(&self) -> &[Trick] {
        &self.state.recent_tricks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn kinds(tricks: &[Trick]) -> Vec<TrickKind> {
        tricks.iter().map(|t| t.kind).collect()
    }

    /// Take off at `start`, rotate by `rotation` over `duration` ms in `steps`
    /// samples, then land. Angles are wrapped to [-π, π) when `wrap` is set.
    fn jump(
        det: &mut TrickDetector,
        start: f64,
        duration: f64,
        rotation: f32,
        steps: u32,
        wrap: bool,
        landing_vy: f32,
    ) -> Vec<Trick> {
        let angle_at = |i: u32| {
            let a = rotation * i as f32 / steps as f32;
            if wrap { wrap_angle(a) } else { a }
        };
        assert!(det.update(false, angle_at(0), 0.0, start).is_empty());
        for i in 1..=steps {
            let t = start + duration * i as f64 / steps as f64;
            assert!(det.update(false, angle_at(i), -2.0, t).is_empty());
        }
        det.update(true, angle_at(steps), landing_vy, start + duration)
    }

    fn wrap_angle(mut a: f32) -> f32 {
        while a >= PI {
            a -= TAU;
        }
        while a < -PI {
            a += TAU;
        }
        a
    }

    #[test]
    fn test_kind_names_match_json() {
        for kind in [
            TrickKind::Flip,
            TrickKind::Backflip,
            TrickKind::Frontflip,
            TrickKind::DoubleFlip,
            TrickKind::AirTime,
            TrickKind::PerfectLanding,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_detector_never_emits_undirected_flip() {
        let mut det = TrickDetector::new(TrickConfig::default());
        let mut tricks = jump(&mut det, 0.0, 1500.0, 3.2 * PI, 150, true, 0.0);
        tricks.extend(jump(&mut det, 2000.0, 1500.0, -3.2 * PI, 150, true, 0.0));
        assert!(!tricks.is_empty());
        assert!(tricks.iter().all(|t| t.kind != TrickKind::Flip));
    }

    #[test]
    fn test_grounded_does_nothing() {
        let mut det = TrickDetector::default();
        assert!(det.update(true, 0.3, 0.0, 0.0).is_empty());
        assert!(!det.is_airborne());
        assert_eq!(det.total_trick_points(), 0);
    }

    #[test]
    fn test_takeoff_edge() {
        let mut det = TrickDetector::new(TrickConfig::default());
        det.update(false, 0.7, 0.0, 500.0);
        let s = det.state();
        assert!(s.is_airborne);
        assert_eq!(s.airborne_start_time, 500.0);
        assert_eq!(s.previous_angle, 0.7);
        assert_eq!(s.total_rotation, 0.0);
    }

    #[test]
    fn test_single_frontflip_with_air_time_no_perfect() {
        let mut det = TrickDetector::new(TrickConfig::default());
        let tricks = jump(&mut det, 0.0, 1000.0, 2.1 * PI, 100, false, 5.0);
        assert_eq!(kinds(&tricks), vec![TrickKind::Frontflip, TrickKind::AirTime]);
        assert_eq!(tricks[0].value, 100);
        assert_eq!(tricks[1].value, 50);
        assert_eq!(tricks[1].label, "Air Time 1.0s");
    }

    #[test]
    fn test_air_time_half_point_rounds_up() {
        let mut det = TrickDetector::new(TrickConfig::default());
        // 1.01 s * 50 pts/s = 50.5
        let tricks = jump(&mut det, 0.0, 1010.0, 0.0, 10, false, 0.0);
        assert_eq!(kinds(&tricks), vec![TrickKind::AirTime]);
        assert_eq!(tricks[0].value, 51);
    }

    #[test]
    fn test_two_turns_emit_frontflip_then_double() {
        let mut det = TrickDetector::new(TrickConfig::default());
        let tricks = jump(&mut det, 0.0, 1000.0, 2.1 * TAU, 100, false, 5.0);
        assert_eq!(
            kinds(&tricks),
            vec![TrickKind::Frontflip, TrickKind::DoubleFlip, TrickKind::AirTime]
        );
        assert_eq!(tricks[1].value, 300);
        assert_eq!(det.total_trick_points(), 100 + 300 + 50);
    }

    #[test]
    fn test_triple_flip_repeats_double() {
        let mut det = TrickDetector::default();
        let tricks = jump(&mut det, 0.0, 800.0, 3.05 * TAU, 150, false, 10.0);
        assert_eq!(
            kinds(&tricks),
            vec![TrickKind::Frontflip, TrickKind::DoubleFlip, TrickKind::DoubleFlip]
        );
    }

    #[test]
    fn test_backflip_perfect_landing() {
        let mut det = TrickDetector::new(TrickConfig::default());
        let tricks = jump(&mut det, 0.0, 700.0, -1.1 * TAU, 60, false, 1.0);
        assert_eq!(
            kinds(&tricks),
            vec![TrickKind::Backflip, TrickKind::PerfectLanding]
        );
        assert_eq!(tricks[0].value, 150);
        assert_eq!(det.total_trick_points(), 200);
    }

    #[test]
    fn test_wrapped_angles_still_count_flips() {
        let mut det = TrickDetector::new(TrickConfig::default());
        let tricks = jump(&mut det, 0.0, 600.0, -1.2 * TAU, 40, true, 0.5);
        assert_eq!(
            kinds(&tricks),
            vec![TrickKind::Backflip, TrickKind::PerfectLanding]
        );
    }

    #[test]
    fn test_no_perfect_landing_without_flip() {
        let mut det = TrickDetector::new(TrickConfig::default());
        let tricks = jump(&mut det, 0.0, 400.0, 0.5, 10, false, 0.0);
        assert!(tricks.is_empty());
        assert_eq!(det.total_trick_points(), 0);
    }

    #[test]
    fn test_flips_buffered_until_landing() {
        let mut det = TrickDetector::new(TrickConfig::default());
        det.update(false, 0.0, 0.0, 0.0);
        for i in 1..=20 {
            det.update(false, 0.4 * i as f32, 0.0, i as f64 * 16.0);
        }
        let s = det.state();
        assert_eq!(s.flips_completed, 1);
        assert_eq!(s.pending_tricks.len(), 1);
        assert_eq!(s.total_trick_points, 0);
        assert!(s.recent_tricks.is_empty());
    }

    #[test]
    fn test_landing_resets_airborne_fields() {
        let mut det = TrickDetector::new(TrickConfig::default());
        jump(&mut det, 0.0, 1200.0, 1.5 * TAU, 50, false, 2.0);
        let s = det.state();
        assert!(!s.is_airborne);
        assert_eq!(s.total_rotation, 0.0);
        assert_eq!(s.flips_completed, 0);
        assert!(s.pending_tricks.is_empty());
        assert_eq!(s.recent_tricks.len(), 3);
        assert!(s.total_trick_points > 0);
    }

    #[test]
    fn test_reversal_keeps_flip_count() {
        let mut det = TrickDetector::new(TrickConfig::default());
        det.update(false, 0.0, 0.0, 0.0);
        let mut angle = 0.0;
        for i in 1..=25 {
            angle += 0.3;
            det.update(false, angle, 0.0, i as f64 * 10.0);
        }
        assert_eq!(det.state().flips_completed, 1);
        for i in 26..=40 {
            angle -= 0.3;
            det.update(false, angle, 0.0, i as f64 * 10.0);
        }
        assert_eq!(det.state().flips_completed, 1);
        assert_eq!(det.state().pending_tricks.len(), 1);
    }

    #[test]
    fn test_clear_old_tricks() {
        let mut det = TrickDetector::new(TrickConfig::default());
        jump(&mut det, 0.0, 1000.0, 1.1 * TAU, 40, false, 9.0);
        assert_eq!(det.recent_tricks().len(), 2);

        det.clear_old_tricks(2500.0);
        assert_eq!(det.recent_tricks().len(), 2);
        det.clear_old_tricks(3000.1);
        assert!(det.recent_tricks().is_empty());
        // Scoring is untouched
        assert_eq!(det.total_trick_points(), 150);
    }

    #[test]
    fn test_reset() {
        let mut det = TrickDetector::new(TrickConfig::default());
        jump(&mut det, 0.0, 1000.0, 1.1 * TAU, 40, false, 1.0);
        det.update(false, 0.0, 0.0, 2000.0);
        det.reset();
        let s = det.state();
        assert!(!s.is_airborne);
        assert_eq!(s.total_trick_points, 0);
        assert!(s.recent_tricks.is_empty());
    }
}
