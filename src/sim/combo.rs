//! Combo chaining
//!
//! Every trick landed inside the combo window bumps the count, refreshes the
//! window and raises the multiplier (1.1x at combo 2, capped at 3.0x by
//! default). Crossing a tier threshold pays a one-time bonus.

use serde::{Deserialize, Serialize};

use crate::tuning::ComboConfig;

/// Combo milestone, ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComboTier {
    #[default]
    None,
    Nice,
    Great,
    Awesome,
    Legendary,
}

impl ComboTier {
    const RANKED: [ComboTier; 4] = [
        ComboTier::Nice,
        ComboTier::Great,
        ComboTier::Awesome,
        ComboTier::Legendary,
    ];

    /// Highest tier whose threshold is <= `count`
    pub fn for_count(count: u32, thresholds: &[u32; 4]) -> Self {
        Self::RANKED
            .iter()
            .zip(thresholds)
            .rev()
            .find(|(_, threshold)| count >= **threshold)
            .map(|(tier, _)| *tier)
            .unwrap_or(ComboTier::None)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ComboTier::None => "",
            ComboTier::Nice => "NICE!",
            ComboTier::Great => "GREAT!",
            ComboTier::Awesome => "AWESOME!",
            ComboTier::Legendary => "LEGENDARY!",
        }
    }

    /// Bonus paid when this tier is reached
    pub fn bonus(&self, bonuses: &[u32; 4]) -> u32 {
        match self {
            ComboTier::None => 0,
            ComboTier::Nice => bonuses[0],
            ComboTier::Great => bonuses[1],
            ComboTier::Awesome => bonuses[2],
            ComboTier::Legendary => bonuses[3],
        }
    }
}

/// Combo snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboState {
    pub count: u32,
    pub multiplier: f64,
    pub tier: ComboTier,
    /// Window left before the combo ends (ms)
    pub time_remaining: f64,
    /// Points banked by the active combo
    pub combo_points: u64,
    /// Lifetime best count, survives combo ends
    pub max_combo: u32,
    pub is_active: bool,
}

impl ComboState {
    fn idle(base_multiplier: f64, max_combo: u32) -> Self {
        Self {
            count: 0,
            multiplier: base_multiplier,
            tier: ComboTier::None,
            time_remaining: 0.0,
            combo_points: 0,
            max_combo,
            is_active: false,
        }
    }
}

/// Result of adding a trick to the combo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComboAward {
    /// Trick points after the multiplier
    pub points: u32,
    /// Set when this trick crossed into a new tier
    pub tier_up: Option<ComboTier>,
    /// Bonus paid for `tier_up` (0 otherwise)
    pub tier_bonus: u32,
}

impl ComboAward {
    /// Everything this trick added to the combo
    pub fn total(&self) -> u32 {
        self.points + self.tier_bonus
    }
}

/// Emitted by [`ComboSystem::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComboUpdate {
    pub combo_ended: bool,
    /// Points banked by the combo that just ended
    pub final_points: u64,
}

#[derive(Debug, Clone)]
pub struct ComboSystem {
    config: ComboConfig,
    state: ComboState,
}

impl Default for ComboSystem {
    fn default() -> Self {
        Self::new(ComboConfig::default())
    }
}

impl ComboSystem {
    pub fn new(config: ComboConfig) -> Self {
        let state = ComboState::idle(config.base_multiplier, 0);
        Self { config, state }
    }

    fn multiplier_for(&self, count: u32) -> f64 {
        let cfg = &self.config;
        let steps = count.saturating_sub(1) as f64;
        (cfg.base_multiplier + steps * cfg.multiplier_per_combo).min(cfg.max_multiplier)
    }

    pub fn add_trick(&mut self, base_points: u32) -> ComboAward {
        let s = &mut self.state;
        s.count += 1;
        s.is_active = true;
        s.time_remaining = self.config.window_ms;
        let count = s.count;

        let multiplier = self.multiplier_for(count);
        let points = crate::round_half_up(base_points as f64 * multiplier) as u32;

        let s = &mut self.state;
        s.multiplier = multiplier;
        s.combo_points += points as u64;
        s.max_combo = s.max_combo.max(count);

        let tier = ComboTier::for_count(count, &self.config.tier_thresholds);
        let mut award = ComboAward {
            points,
            tier_up: None,
            tier_bonus: 0,
        };
        if tier != s.tier && tier != ComboTier::None {
            award.tier_up = Some(tier);
            award.tier_bonus = tier.bonus(&self.config.tier_bonuses);
            s.combo_points += award.tier_bonus as u64;
            log::debug!(
                "Combo tier {} at x{} (+{} bonus)",
                tier.label(),
                count,
                award.tier_bonus
            );
        }
        s.tier = tier;

        award
    }

    /// Age the combo window by `delta_ms`
    pub fn update(&mut self, delta_ms: f64) -> ComboUpdate {
        if !self.state.is_active {
            return ComboUpdate::default();
        }

        self.state.time_remaining -= delta_ms;
        if self.state.time_remaining > 0.0 {
            return ComboUpdate::default();
        }

        let final_points = self.state.combo_points;
        log::info!(
            "Combo x{} ended with {} points",
            self.state.count,
            final_points
        );
        self.state = ComboState::idle(self.config.base_multiplier, self.state.max_combo);

        ComboUpdate {
            combo_ended: true,
            final_points,
        }
    }

    /// Full reset, including the lifetime best
    pub fn reset(&mut self) {
        self.state = ComboState::idle(self.config.base_multiplier, 0);
    }

    pub fn tier_label(&self) -> &'static str {
        self.state.tier.label()
    }

    pub fn state(&self) -> ComboState {
        self.state.clone()
    }

    pub fn max_combo(&self) -> u32 {
        self.state.max_combo
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active
    }
}
