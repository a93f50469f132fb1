//! Ghost runs
//!
//! A ghost is a time-sampled trace of one run (position, angle, boost flag)
//! that can be replayed next to a live run. Runs are immutable once the
//! recorder stops; players only ever read them, so one `Rc<GhostRun>` can
//! drive any number of players.

pub mod codec;
pub mod player;
pub mod recorder;

use chrono::{DateTime, Utc};
use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use codec::{
    CompressedGhostRun, GhostCodecError, PackedFrame, compress_ghost_run, decode_or_none,
    decompress_ghost_run,
};
pub use player::{GhostInfo, GhostPlayer, GhostPlayerState};
pub use recorder::GhostRecorder;

/// One recorded sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GhostFrame {
    /// Time since run start (ms)
    pub time: f64,
    pub pos: Vec2,
    pub angle: f32,
    pub is_boosting: bool,
}

/// A finished recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GhostRun {
    pub id: String,
    pub player_name: String,
    pub vehicle_id: String,
    pub stage_id: String,
    pub distance: f32,
    pub coins: u32,
    pub recorded_at: DateTime<Utc>,
    /// Sampling interval the run was recorded with (ms)
    pub frame_interval: u32,
    /// Ordered by non-decreasing time
    pub frames: Vec<GhostFrame>,
}

impl GhostRun {
    /// Length of the recording (ms)
    pub fn duration(&self) -> f64 {
        self.frames.last().map(|f| f.time).unwrap_or(0.0)
    }
}
