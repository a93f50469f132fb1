//! Fixed timestep run tick
//!
//! Advances every system by one tick in a fixed order:
//! tricks -> combo -> boost, then ghost record/playback off the same clock.

use glam::Vec2;

use super::combo::ComboAward;
use super::state::RunState;
use super::trick::Trick;

/// Physics sample and controls for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub is_grounded: bool,
    /// Car angle (rad); may be wrapped or unbounded
    pub car_angle: f32,
    pub car_velocity_y: f32,
    pub car_pos: Vec2,
    /// Boost control held down
    pub boost_held: bool,
    /// Coins picked up this tick
    pub coins_collected: u32,
}

/// What happened during a tick (for HUD, audio and haptics)
#[derive(Debug, Clone, Default)]
pub struct TickEvents {
    /// Tricks scored on landing
    pub tricks: Vec<Trick>,
    /// One award per trick, same order
    pub awards: Vec<ComboAward>,
    /// Final points of a combo that timed out this tick
    pub combo_ended: Option<u64>,
    pub boost_gained: f32,
    pub boost_started: bool,
    pub boost_stopped: bool,
}

/// Advance the run by one fixed timestep of `dt_ms`
pub fn tick(state: &mut RunState, input: &TickInput, dt_ms: f64) -> TickEvents {
    let mut events = TickEvents::default();

    state.elapsed_ms += dt_ms;
    state.time_ticks += 1;
    let now = state.elapsed_ms;

    // Tricks feed the combo, combo points feed the boost meter
    events.tricks = state.tricks.update(
        input.is_grounded,
        input.car_angle,
        input.car_velocity_y,
        now,
    );
    for trick in &events.tricks {
        let award = state.combo.add_trick(trick.value);
        state.score += award.total() as u64;
        events.boost_gained += state.boost.add_boost(award.total());
        events.awards.push(award);
    }

    // Boost control
    let was_boosting = state.boost.is_boosting();
    if input.boost_held && !was_boosting {
        events.boost_started = state.boost.start_boost();
    } else if !input.boost_held && was_boosting {
        state.boost.stop_boost();
    }

    let combo = state.combo.update(dt_ms);
    if combo.combo_ended {
        events.combo_ended = Some(combo.final_points);
    }
    state.boost.update(dt_ms);
    events.boost_stopped = was_boosting && !state.boost.is_boosting();

    state.tricks.clear_old_tricks(now);

    state.distance = state.distance.max(input.car_pos.x);
    state.coins += input.coins_collected;

    state.recorder.record_frame(
        now,
        input.car_pos,
        input.car_angle,
        state.boost.is_boosting(),
    );
    state.ghost.update(now, input.car_pos.x);

    events
}
