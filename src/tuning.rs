//! Data-driven game balance
//!
//! Every value the trick, combo, boost and ghost systems read lives here so
//! balance passes only touch JSON. Sections are `#[serde(default)]`, so a
//! tuning file may override just the fields it cares about.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_WRAP_THRESHOLD, FRAME_INTERVAL_MS};

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Trick scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrickConfig {
    /// Base value of a single flip
    pub flip_points: u32,
    /// Backflips are worth `flip_points * backflip_multiplier`
    pub backflip_multiplier: f32,
    /// Fixed value of a double flip (either direction)
    pub double_flip_points: u32,
    pub air_time_points_per_second: f32,
    /// Seconds airborne before the air time bonus kicks in
    pub min_air_time_for_bonus: f32,
    pub perfect_landing_points: u32,
    /// Landing |vy| must be strictly below this for a perfect landing
    pub perfect_landing_max_velocity: f32,
    /// How long a landed trick stays in the recent list (ms)
    pub trick_display_duration_ms: f64,
    /// Per-tick rotation above this (rad) is treated as wraparound
    pub wrap_threshold: f32,
}

impl Default for TrickConfig {
    fn default() -> Self {
        Self {
            flip_points: 100,
            backflip_multiplier: 1.5,
            double_flip_points: 300,
            air_time_points_per_second: 50.0,
            min_air_time_for_bonus: 1.0,
            perfect_landing_points: 50,
            perfect_landing_max_velocity: 3.0,
            trick_display_duration_ms: 2000.0,
            wrap_threshold: DEFAULT_WRAP_THRESHOLD,
        }
    }
}

impl TrickConfig {
    pub fn frontflip_points(&self) -> u32 {
        self.flip_points
    }

    pub fn backflip_points(&self) -> u32 {
        crate::round_half_up(self.flip_points as f64 * self.backflip_multiplier as f64) as u32
    }
}

/// Combo window, multiplier curve and tier milestones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboConfig {
    /// Time a combo survives without a new trick (ms)
    pub window_ms: f64,
    pub base_multiplier: f64,
    /// Multiplier added per trick after the first
    pub multiplier_per_combo: f64,
    pub max_multiplier: f64,
    /// Combo counts that unlock nice / great / awesome / legendary
    pub tier_thresholds: [u32; 4],
    /// One-time bonus for reaching each tier, same order as the thresholds
    pub tier_bonuses: [u32; 4],
}

impl Default for ComboConfig {
    fn default() -> Self {
        Self {
            window_ms: 2500.0,
            base_multiplier: 1.0,
            multiplier_per_combo: 0.1,
            max_multiplier: 3.0,
            tier_thresholds: [2, 5, 10, 20],
            tier_bonuses: [50, 100, 250, 500],
        }
    }
}

/// Boost meter economy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostConfig {
    pub max_amount: f32,
    /// Meter gained per trick point
    pub gain_per_point: f32,
    /// Meter needed before boost can be activated
    pub min_activation_amount: f32,
    /// Meter drained per second while boosting
    pub consume_rate: f32,
    /// Meter regenerated per second while idle
    pub passive_regen: f32,
    /// Lockout after boost stops (ms)
    pub cooldown_ms: f64,
    /// Vehicle power multiplier while boosting
    pub power_multiplier: f32,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            max_amount: 100.0,
            gain_per_point: 0.1,
            min_activation_amount: 20.0,
            consume_rate: 25.0,
            passive_regen: 2.0,
            cooldown_ms: 1000.0,
            power_multiplier: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GhostConfig {
    /// Minimum spacing between recorded frames (ms)
    pub frame_interval_ms: u32,
    /// Name stamped on recorded runs
    pub player_name: String,
}

impl Default for GhostConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: FRAME_INTERVAL_MS,
            player_name: "Player".to_string(),
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub tricks: TrickConfig,
    pub combo: ComboConfig,
    pub boost: BoostConfig,
    pub ghost: GhostConfig,
}

impl Tuning {
    /// Parse tuning JSON. Missing fields take their defaults; the result is
    /// passed through [`Tuning::validate`].
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let mut tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate();
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a tuning file, falling back to defaults if it is missing or bad
    pub fn load(path: &Path) -> Self {
        let result = std::fs::read_to_string(path)
            .map_err(TuningError::from)
            .and_then(|json| Self::from_json(&json));

        match result {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Clamp out-of-range values instead of rejecting the file
    pub fn validate(&mut self) {
        let t = &mut self.tricks;
        t.backflip_multiplier = t.backflip_multiplier.max(1.0);
        t.air_time_points_per_second = t.air_time_points_per_second.max(0.0);
        t.min_air_time_for_bonus = t.min_air_time_for_bonus.max(0.0);
        t.perfect_landing_max_velocity = t.perfect_landing_max_velocity.max(0.0);
        t.trick_display_duration_ms = t.trick_display_duration_ms.max(0.0);
        if !(t.wrap_threshold > 0.0 && t.wrap_threshold <= std::f32::consts::PI) {
            t.wrap_threshold = DEFAULT_WRAP_THRESHOLD;
        }

        let c = &mut self.combo;
        c.window_ms = c.window_ms.max(0.0);
        c.base_multiplier = c.base_multiplier.max(0.0);
        c.multiplier_per_combo = c.multiplier_per_combo.max(0.0);
        c.max_multiplier = c.max_multiplier.max(c.base_multiplier);
        c.tier_thresholds[0] = c.tier_thresholds[0].max(1);
        for i in 1..c.tier_thresholds.len() {
            c.tier_thresholds[i] = c.tier_thresholds[i].max(c.tier_thresholds[i - 1]);
        }

        let b = &mut self.boost;
        b.max_amount = b.max_amount.max(0.0);
        b.gain_per_point = b.gain_per_point.max(0.0);
        b.min_activation_amount = b.min_activation_amount.clamp(0.0, b.max_amount);
        b.consume_rate = b.consume_rate.max(0.0);
        b.passive_regen = b.passive_regen.max(0.0);
        b.cooldown_ms = b.cooldown_ms.max(0.0);
        b.power_multiplier = b.power_multiplier.max(1.0);

        self.ghost.frame_interval_ms = self.ghost.frame_interval_ms.max(1);
    }
}
