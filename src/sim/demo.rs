//! Scripted hill run
//!
//! Stands in for the physics engine in the demo binary and in tests: a seeded
//! driver that rolls along, jumps, spins and lands, producing one
//! `TickInput` per tick. Same seed, same run.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::tick::TickInput;
use crate::normalize_angle;

/// Gravity used for the jump arcs (units/s²)
const GRAVITY: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Rolling { ticks_left: u32 },
    Airborne { ticks_left: u32, spin_per_tick: f32 },
}

#[derive(Debug, Clone)]
pub struct ScriptedRun {
    rng: Pcg32,
    phase: Phase,
    pos: Vec2,
    /// Unwrapped body angle (rad)
    angle: f32,
    vel: Vec2,
    boost_held: bool,
}

impl ScriptedRun {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let first_roll = rng.random_range(30..90);
        Self {
            rng,
            phase: Phase::Rolling {
                ticks_left: first_roll,
            },
            pos: Vec2::ZERO,
            angle: 0.0,
            vel: Vec2::new(12.0, 0.0),
            boost_held: false,
        }
    }

    /// Produce the next physics sample
    pub fn next_input(&mut self, dt_ms: f64) -> TickInput {
        let dt = (dt_ms / 1000.0) as f32;

        let phase = self.phase;
        self.phase = match phase {
            Phase::Rolling { ticks_left: 0 } => self.launch(dt),
            Phase::Rolling { ticks_left } => {
                self.roll(dt);
                Phase::Rolling {
                    ticks_left: ticks_left - 1,
                }
            }
            Phase::Airborne { ticks_left: 0, .. } => self.touch_down(),
            Phase::Airborne {
                ticks_left,
                spin_per_tick,
            } => {
                self.fly(dt, spin_per_tick);
                Phase::Airborne {
                    ticks_left: ticks_left - 1,
                    spin_per_tick,
                }
            }
        };

        let is_grounded = matches!(self.phase, Phase::Rolling { .. });
        let coins_collected = if is_grounded && self.rng.random_bool(0.01) {
            1
        } else {
            0
        };

        TickInput {
            is_grounded,
            car_angle: normalize_angle(self.angle),
            car_velocity_y: self.vel.y,
            car_pos: self.pos,
            boost_held: self.boost_held,
            coins_collected,
        }
    }

    fn roll(&mut self, dt: f32) {
        if self.rng.random_bool(0.02) {
            self.boost_held = !self.boost_held;
        }
        let speed = if self.boost_held { 18.0 } else { 12.0 };
        self.vel = Vec2::new(speed, 0.0);
        self.pos += self.vel * dt;
        self.angle = 0.0;
    }

    fn launch(&mut self, dt: f32) -> Phase {
        let air_ticks: u32 = self.rng.random_range(30..110);
        let turns: f32 = self.rng.random_range(-2.4..2.4);
        let air_secs = air_ticks as f32 * dt;
        // Symmetric arc: leave with the speed that lands after `air_secs`
        self.vel.y = GRAVITY * air_secs / 2.0;
        self.boost_held = false;
        Phase::Airborne {
            ticks_left: air_ticks,
            spin_per_tick: turns * TAU / air_ticks as f32,
        }
    }

    fn fly(&mut self, dt: f32, spin_per_tick: f32) {
        self.vel.y -= GRAVITY * dt;
        self.pos += self.vel * dt;
        self.angle += spin_per_tick;
    }

    fn touch_down(&mut self) -> Phase {
        // Settle onto the nearest whole turn, landing speed varies
        self.angle = (self.angle / TAU).round() * TAU;
        self.pos.y = 0.0;
        let landing_speed: f32 = self.rng.random_range(0.0..6.0);
        self.vel.y = -landing_speed;
        Phase::Rolling {
            ticks_left: self.rng.random_range(40..160),
        }
    }
}
