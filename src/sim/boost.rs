//! Boost meter
//!
//! Filled by trick points, drained while boosting, slowly regenerated while
//! idle. Stopping (by hand or by running dry) starts a cooldown.

use serde::{Deserialize, Serialize};

use crate::tuning::BoostConfig;

/// Boost snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostState {
    /// Meter level, 0..=max_amount
    pub amount: f32,
    pub is_boosting: bool,
    /// 1.0 when idle
    pub power_multiplier: f32,
    /// Time since activation (ms)
    pub boost_time: f64,
    /// Lockout remaining (ms)
    pub cooldown: f64,
}

impl Default for BoostState {
    fn default() -> Self {
        Self {
            amount: 0.0,
            is_boosting: false,
            power_multiplier: 1.0,
            boost_time: 0.0,
            cooldown: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BoostSystem {
    config: BoostConfig,
    state: BoostState,
}

impl BoostSystem {
    pub fn new(config: BoostConfig) -> Self {
        Self {
            config,
            state: BoostState::default(),
        }
    }

    /// Credit trick points to the meter. Returns the amount actually added,
    /// which is less than the nominal gain near the cap.
    pub fn add_boost(&mut self, trick_points: u32) -> f32 {
        let before = self.state.amount;
        let gain = trick_points as f32 * self.config.gain_per_point;
        let after = (before + gain).min(self.config.max_amount);
        self.state.amount = after;
        after - before
    }

    pub fn can_boost(&self) -> bool {
        self.state.amount >= self.config.min_activation_amount
            && self.state.cooldown <= 0.0
            && !self.state.is_boosting
    }

    /// Activate boost if allowed; returns false (and changes nothing) otherwise
    pub fn start_boost(&mut self) -> bool {
        if !self.can_boost() {
            return false;
        }
        self.state.is_boosting = true;
        self.state.power_multiplier = self.config.power_multiplier;
        self.state.boost_time = 0.0;
        true
    }

    pub fn stop_boost(&mut self) {
        if !self.state.is_boosting {
            return;
        }
        self.state.is_boosting = false;
        self.state.power_multiplier = 1.0;
        self.state.boost_time = 0.0;
        self.state.cooldown = self.config.cooldown_ms;
    }

    /// Advance timers and drain or regenerate the meter
    pub fn update(&mut self, delta_ms: f64) {
        if self.state.cooldown > 0.0 {
            self.state.cooldown = (self.state.cooldown - delta_ms).max(0.0);
        }

        let dt_secs = (delta_ms / 1000.0) as f32;
        if self.state.is_boosting {
            self.state.boost_time += delta_ms;
            self.state.amount -= self.config.consume_rate * dt_secs;
            if self.state.amount <= 0.0 {
                self.state.amount = 0.0;
                log::info!(
                    "Boost depleted after {:.0} ms",
                    self.state.boost_time
                );
                self.stop_boost();
            }
        } else {
            self.state.amount =
                (self.state.amount + self.config.passive_regen * dt_secs).min(self.config.max_amount);
        }
    }

    /// Meter fill, 0.0..=1.0
    pub fn percentage(&self) -> f32 {
        if self.config.max_amount <= 0.0 {
            return 0.0;
        }
        self.state.amount / self.config.max_amount
    }

    pub fn reset(&mut self) {
        self.state = BoostState::default();
    }

    pub fn state(&self) -> BoostState {
        self.state.clone()
    }

    pub fn is_boosting(&self) -> bool {
        self.state.is_boosting
    }

    pub fn power_multiplier(&self) -> f32 {
        self.state.power_multiplier
    }

    pub fn amount(&self) -> f32 {
        self.state.amount
    }
}
