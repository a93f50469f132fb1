//! Compressed ghost format
//!
//! The first frame holds rounded absolute values; every later frame holds the
//! delta from the previous *rounded* frame: whole milliseconds and units for
//! time and position, hundredths of a radian for angle, 0/1 for boost. Deltas
//! are taken between rounded values, so the error never accumulates: each
//! decoded frame is within 0.5 units and 0.005 rad of the original.
//!
//! ```json
//! { "id": "...", "playerName": "Ada", ..., "frameInterval": 50,
//!   "frames": [[0, 12, -3, 0.25, 0], [50, 8, 1, -0.02, 1], ...] }
//! ```

use chrono::{DateTime, Utc};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{GhostFrame, GhostRun};
use crate::{round_half_up, round_to};

const ANGLE_DECIMALS: i32 = 2;

#[derive(Debug, Error)]
pub enum GhostCodecError {
    #[error("invalid ghost JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("frame {index}: non-finite value")]
    NonFinite { index: usize },

    #[error("frame {index}: boost flag must be 0 or 1, got {value}")]
    BadBoostFlag { index: usize, value: u8 },

    #[error("frame {index}: time runs backwards")]
    TimeReversed { index: usize },

    #[error("frame {index}: running total overflows")]
    Overflow { index: usize },

    #[error("frame interval must be positive")]
    BadFrameInterval,
}

/// `[time, x, y, angle, boost]`, absolute for the first frame and deltas after
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackedFrame(pub i64, pub i64, pub i64, pub f64, pub u8);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressedGhostRun {
    pub id: String,
    pub player_name: String,
    pub vehicle_id: String,
    pub stage_id: String,
    pub distance: f32,
    pub coins: u32,
    pub recorded_at: DateTime<Utc>,
    pub frame_interval: u32,
    pub frames: Vec<PackedFrame>,
}

impl CompressedGhostRun {
    pub fn to_json(&self) -> Result<String, GhostCodecError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, GhostCodecError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Quantized frame values
#[derive(Debug, Clone, Copy, Default)]
struct Quantized {
    time: i64,
    x: i64,
    y: i64,
    angle: f64,
}

impl Quantized {
    fn of(frame: &GhostFrame) -> Self {
        Self {
            time: round_half_up(frame.time) as i64,
            x: round_half_up(frame.pos.x as f64) as i64,
            y: round_half_up(frame.pos.y as f64) as i64,
            angle: round_to(frame.angle as f64, ANGLE_DECIMALS),
        }
    }
}

pub fn compress_ghost_run(run: &GhostRun) -> CompressedGhostRun {
    let mut frames = Vec::with_capacity(run.frames.len());
    let mut prev: Option<Quantized> = None;

    for frame in &run.frames {
        let q = Quantized::of(frame);
        let boost = frame.is_boosting as u8;
        let packed = match prev {
            None => PackedFrame(q.time, q.x, q.y, q.angle, boost),
            Some(p) => PackedFrame(
                q.time - p.time,
                q.x - p.x,
                q.y - p.y,
                round_to(q.angle - p.angle, ANGLE_DECIMALS),
                boost,
            ),
        };
        frames.push(packed);
        prev = Some(q);
    }

    CompressedGhostRun {
        id: run.id.clone(),
        player_name: run.player_name.clone(),
        vehicle_id: run.vehicle_id.clone(),
        stage_id: run.stage_id.clone(),
        distance: run.distance,
        coins: run.coins,
        recorded_at: run.recorded_at,
        frame_interval: run.frame_interval,
        frames,
    }
}

/// Rebuild absolute frames by running sums. Malformed data is rejected
/// rather than producing a partial run.
pub fn decompress_ghost_run(data: &CompressedGhostRun) -> Result<GhostRun, GhostCodecError> {
    if data.frame_interval == 0 {
        return Err(GhostCodecError::BadFrameInterval);
    }

    let mut frames = Vec::with_capacity(data.frames.len());
    let mut acc = Quantized::default();

    for (index, &PackedFrame(dt, dx, dy, da, boost)) in data.frames.iter().enumerate() {
        if !da.is_finite() {
            return Err(GhostCodecError::NonFinite { index });
        }
        if boost > 1 {
            return Err(GhostCodecError::BadBoostFlag { index, value: boost });
        }
        if dt < 0 {
            return Err(GhostCodecError::TimeReversed { index });
        }

        let (Some(time), Some(x), Some(y)) = (
            acc.time.checked_add(dt),
            acc.x.checked_add(dx),
            acc.y.checked_add(dy),
        ) else {
            return Err(GhostCodecError::Overflow { index });
        };
        acc.time = time;
        acc.x = x;
        acc.y = y;
        acc.angle = round_to(acc.angle + da, ANGLE_DECIMALS);

        frames.push(GhostFrame {
            time: acc.time as f64,
            pos: Vec2::new(acc.x as f32, acc.y as f32),
            angle: acc.angle as f32,
            is_boosting: boost == 1,
        });
    }

    Ok(GhostRun {
        id: data.id.clone(),
        player_name: data.player_name.clone(),
        vehicle_id: data.vehicle_id.clone(),
        stage_id: data.stage_id.clone(),
        distance: data.distance,
        coins: data.coins,
        recorded_at: data.recorded_at,
        frame_interval: data.frame_interval,
        frames,
    })
}

/// Decode a stored ghost, treating any failure as "no ghost available"
pub fn decode_or_none(json: &str) -> Option<GhostRun> {
    match CompressedGhostRun::from_json(json).and_then(|data| decompress_ghost_run(&data)) {
        Ok(run) => Some(run),
        Err(e) => {
            log::warn!("Discarding stored ghost: {}", e);
            None
        }
    }
}
