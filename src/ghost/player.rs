//! Ghost playback
//!
//! Plays a recorded run against the live clock, interpolating between
//! frames and reporting how far ahead or behind the live car is.

use std::rc::Rc;

use glam::Vec2;
use serde::Serialize;

use super::GhostRun;

/// Playback snapshot for the HUD
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GhostPlayerState {
    pub is_playing: bool,
    /// Frame at or before the playback time; only moves forward
    pub frame_index: usize,
    pub pos: Vec2,
    pub angle: f32,
    pub is_boosting: bool,
    /// Ghost x minus player x (positive: ghost is ahead)
    pub distance_delta: f32,
    /// Ghost's time at the player's x minus the current time (positive:
    /// the player got there first). `None` when the ghost never got that far.
    pub time_delta: Option<f64>,
}

/// Read-only ghost summary
#[derive(Debug, Clone, PartialEq)]
pub struct GhostInfo {
    pub name: String,
    pub distance: f32,
}

#[derive(Debug, Clone, Default)]
pub struct GhostPlayer {
    ghost: Option<Rc<GhostRun>>,
    state: GhostPlayerState,
    /// Furthest x reached up to each frame (running max, so sorted)
    reach: Vec<f32>,
}

impl GhostPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a run and rewind to its first frame
    pub fn start(&mut self, ghost: Rc<GhostRun>) {
        let first = ghost.frames.first();
        self.state = GhostPlayerState {
            is_playing: true,
            frame_index: 0,
            pos: first.map(|f| f.pos).unwrap_or(Vec2::ZERO),
            angle: first.map(|f| f.angle).unwrap_or(0.0),
            is_boosting: first.map(|f| f.is_boosting).unwrap_or(false),
            distance_delta: 0.0,
            time_delta: None,
        };
        self.reach = ghost
            .frames
            .iter()
            .scan(f32::NEG_INFINITY, |best, f| {
                *best = best.max(f.pos.x);
                Some(*best)
            })
            .collect();
        log::info!(
            "Ghost playback started: {} ({} frames, {:.0} m)",
            ghost.player_name,
            ghost.frames.len(),
            ghost.distance
        );
        self.ghost = Some(ghost);
    }

    /// Move playback to `current_time` (ms since run start)
    pub fn update(&mut self, current_time: f64, player_x: f32) {
        let Some(ghost) = self.ghost.as_deref() else {
            return;
        };
        let frames = &ghost.frames;
        if frames.is_empty() {
            return;
        }

        let s = &mut self.state;
        while s.frame_index + 1 < frames.len() && frames[s.frame_index + 1].time <= current_time {
            s.frame_index += 1;
        }

        let frame = &frames[s.frame_index];
        match frames.get(s.frame_index + 1) {
            Some(next) => {
                let span = next.time - frame.time;
                let progress = if span > 0.0 {
                    ((current_time - frame.time) / span).clamp(0.0, 1.0) as f32
                } else {
                    0.0
                };
                s.pos = frame.pos.lerp(next.pos, progress);
                s.angle = frame.angle + (next.angle - frame.angle) * progress;
            }
            None => {
                s.pos = frame.pos;
                s.angle = frame.angle;
            }
        }
        // Boost is a step, not interpolated
        s.is_boosting = frame.is_boosting;

        s.distance_delta = s.pos.x - player_x;
        // First frame whose x reaches the player's
        let first_reach = self.reach.partition_point(|&x| x < player_x);
        s.time_delta = frames.get(first_reach).map(|f| f.time - current_time);
    }

    /// Unbind the ghost
    pub fn stop(&mut self) {
        if self.ghost.take().is_some() {
            log::info!("Ghost playback stopped");
        }
        self.state = GhostPlayerState::default();
        self.reach.clear();
    }

    pub fn ghost_info(&self) -> Option<GhostInfo> {
        self.ghost.as_ref().map(|g| GhostInfo {
            name: g.player_name.clone(),
            distance: g.distance,
        })
    }

    pub fn state(&self) -> GhostPlayerState {
        self.state.clone()
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }
}
