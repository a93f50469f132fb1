//! Run state
//!
//! Everything one run needs, owned by the host and advanced by `tick`.

use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::boost::BoostSystem;
use super::combo::ComboSystem;
use super::trick::TrickDetector;
use crate::ghost::{GhostPlayer, GhostRecorder, GhostRun};
use crate::tuning::Tuning;

/// End-of-run totals handed to the progress/achievement layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub vehicle_id: String,
    pub stage_id: String,
    /// Furthest x reached
    pub distance: f32,
    pub coins: u32,
    /// Trick points after combo multipliers and tier bonuses
    pub score: u64,
    /// Raw trick points
    pub total_trick_points: u64,
    pub max_combo: u32,
    pub elapsed_ms: f64,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RunState {
    pub vehicle_id: String,
    pub stage_id: String,
    pub tricks: TrickDetector,
    pub combo: ComboSystem,
    pub boost: BoostSystem,
    pub recorder: GhostRecorder,
    pub ghost: GhostPlayer,
    /// Run clock (ms since start)
    pub elapsed_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub distance: f32,
    pub coins: u32,
    pub score: u64,
}

impl RunState {
    /// New run with recording already started at t = 0
    pub fn new(tuning: &Tuning, vehicle_id: &str, stage_id: &str) -> Self {
        let mut recorder = GhostRecorder::new(&tuning.ghost);
        recorder.start(0.0);

        Self {
            vehicle_id: vehicle_id.to_string(),
            stage_id: stage_id.to_string(),
            tricks: TrickDetector::new(tuning.tricks.clone()),
            combo: ComboSystem::new(tuning.combo.clone()),
            boost: BoostSystem::new(tuning.boost.clone()),
            recorder,
            ghost: GhostPlayer::new(),
            elapsed_ms: 0.0,
            time_ticks: 0,
            distance: 0.0,
            coins: 0,
            score: 0,
        }
    }

    /// Race against a previously recorded run
    pub fn with_ghost(mut self, ghost: Rc<GhostRun>) -> Self {
        self.ghost.start(ghost);
        self
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            vehicle_id: self.vehicle_id.clone(),
            stage_id: self.stage_id.clone(),
            distance: self.distance,
            coins: self.coins,
            score: self.score,
            total_trick_points: self.tricks.total_trick_points(),
            max_combo: self.combo.max_combo(),
            elapsed_ms: self.elapsed_ms,
            finished_at: Utc::now(),
        }
    }

    /// End the run: stop recording and playback, return totals and the ghost
    pub fn finish(&mut self) -> (RunSummary, GhostRun) {
        if self.boost.is_boosting() {
            self.boost.stop_boost();
        }
        let summary = self.summary();
        let run = self
            .recorder
            .stop(&self.vehicle_id, &self.stage_id, self.distance, self.coins);
        self.ghost.stop();
        log::info!(
            "Run finished on {}: {:.0} m, score {}, max combo x{}",
            summary.stage_id,
            summary.distance,
            summary.score,
            summary.max_combo
        );
        (summary, run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_is_recording() {
        let state = RunState::new(&Tuning::default(), "jeep", "countryside");
        assert!(state.recorder.is_recording());
        assert!(!state.ghost.is_playing());
        assert_eq!(state.summary().total_trick_points, 0);
    }

    #[test]
    fn test_finish_returns_ghost_and_summary() {
        let mut state = RunState::new(&Tuning::default(), "jeep", "countryside");
        state.distance = 120.0;
        state.coins = 4;
        let (summary, run) = state.finish();
        assert_eq!(summary.distance, 120.0);
        assert_eq!(run.stage_id, "countryside");
        assert_eq!(run.coins, 4);
        assert!(!state.recorder.is_recording());
    }
}
