//! Ghost recording
//!
//! Decimates per-tick car samples down to one frame per `frame_interval`.

use chrono::Utc;
use glam::Vec2;

use super::{GhostFrame, GhostRun};
use crate::tuning::GhostConfig;

#[derive(Debug, Clone)]
pub struct GhostRecorder {
    frame_interval: u32,
    player_name: String,
    frames: Vec<GhostFrame>,
    /// Clock reading at `start` (ms)
    start_time: f64,
    /// Elapsed time of the newest frame
    last_frame_time: Option<f64>,
    is_recording: bool,
}

impl Default for GhostRecorder {
    fn default() -> Self {
        Self::new(&GhostConfig::default())
    }
}

impl GhostRecorder {
    pub fn new(config: &GhostConfig) -> Self {
        Self {
            frame_interval: config.frame_interval_ms,
            player_name: config.player_name.clone(),
            frames: Vec::new(),
            start_time: 0.0,
            last_frame_time: None,
            is_recording: false,
        }
    }

    /// Begin a fresh recording at clock reading `now` (ms)
    pub fn start(&mut self, now: f64) {
        self.frames.clear();
        self.start_time = now;
        self.last_frame_time = None;
        self.is_recording = true;
        log::info!("Ghost recording started");
    }

    /// Offer a sample; kept only if a full interval has passed since the
    /// previous frame (the first sample is always kept)
    pub fn record_frame(&mut self, now: f64, pos: Vec2, angle: f32, is_boosting: bool) {
        if !self.is_recording {
            return;
        }

        let elapsed = now - self.start_time;
        if let Some(last) = self.last_frame_time {
            if elapsed - last < self.frame_interval as f64 {
                return;
            }
        }

        self.frames.push(GhostFrame {
            time: elapsed,
            pos,
            angle,
            is_boosting,
        });
        self.last_frame_time = Some(elapsed);
    }

    /// Finish the recording and hand back the run. The recorder is left empty.
    pub fn stop(&mut self, vehicle_id: &str, stage_id: &str, distance: f32, coins: u32) -> GhostRun {
        self.is_recording = false;
        self.last_frame_time = None;
        let frames = std::mem::take(&mut self.frames);
        log::info!(
            "Ghost recording stopped: {} frames, {:.0} m on {}",
            frames.len(),
            distance,
            stage_id
        );

        GhostRun {
            id: uuid::Uuid::new_v4().to_string(),
            player_name: self.player_name.clone(),
            vehicle_id: vehicle_id.to_string(),
            stage_id: stage_id.to_string(),
            distance,
            coins,
            recorded_at: Utc::now(),
            frame_interval: self.frame_interval,
            frames,
        }
    }

    /// Drop an in-progress recording
    pub fn reset(&mut self) {
        self.frames.clear();
        self.start_time = 0.0;
        self.last_frame_time = None;
        self.is_recording = false;
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_recording_ignores_frames() {
        let mut rec = GhostRecorder::default();
        rec.record_frame(0.0, Vec2::ZERO, 0.0, false);
        assert_eq!(rec.frame_count(), 0);
    }

    #[test]
    fn test_decimates_to_frame_interval() {
        let mut rec = GhostRecorder::default();
        rec.start(1000.0);
        for i in 0..=20 {
            let t = 1000.0 + i as f64 * 10.0;
            rec.record_frame(t, Vec2::new(i as f32, 0.0), 0.0, false);
        }
        let n = rec.frame_count();
        assert!((4..=5).contains(&n), "got {n} frames");

        let run = rec.stop("jeep", "countryside", 20.0, 3);
        let times: Vec<f64> = run.frames.iter().map(|f| f.time).collect();
        assert_eq!(times, vec![0.0, 50.0, 100.0, 150.0, 200.0]);
    }

    #[test]
    fn test_uneven_ticks_respect_interval() {
        let mut rec = GhostRecorder::default();
        rec.start(0.0);
        for t in [0.0, 30.0, 49.0, 51.0, 70.0, 101.0, 140.0, 152.0] {
            rec.record_frame(t, Vec2::ZERO, 0.0, false);
        }
        let run = rec.stop("jeep", "moon", 0.0, 0);
        let times: Vec<f64> = run.frames.iter().map(|f| f.time).collect();
        assert_eq!(times, vec![0.0, 51.0, 101.0, 152.0]);
    }

    #[test]
    fn test_stop_packages_run_and_clears() {
        let config = GhostConfig {
            player_name: "Ada".into(),
            ..Default::default()
        };
        let mut rec = GhostRecorder::new(&config);
        rec.start(0.0);
        rec.record_frame(0.0, Vec2::new(1.0, 2.0), 0.5, true);
        let run = rec.stop("truck", "desert", 512.0, 40);

        assert!(!rec.is_recording());
        assert_eq!(rec.frame_count(), 0);
        assert_eq!(run.player_name, "Ada");
        assert_eq!(run.vehicle_id, "truck");
        assert_eq!(run.stage_id, "desert");
        assert_eq!(run.coins, 40);
        assert_eq!(run.frame_interval, 50);
        assert_eq!(run.frames.len(), 1);
        assert!(run.frames[0].is_boosting);
        assert!(!run.id.is_empty());
    }

    #[test]
    fn test_reset_discards() {
        let mut rec = GhostRecorder::default();
        rec.start(0.0);
        rec.record_frame(0.0, Vec2::ZERO, 0.0, false);
        rec.reset();
        assert!(!rec.is_recording());
        assert_eq!(rec.frame_count(), 0);
    }

    #[test]
    fn test_restart_clears_previous_frames() {
        let mut rec = GhostRecorder::default();
        rec.start(0.0);
        rec.record_frame(0.0, Vec2::ZERO, 0.0, false);
        rec.record_frame(60.0, Vec2::ZERO, 0.0, false);
        rec.start(500.0);
        rec.record_frame(500.0, Vec2::ZERO, 0.0, false);
        assert_eq!(rec.frame_count(), 1);
    }
}
