//! Per-tick run simulation
//!
//! All gameplay bookkeeping lives here. Every system is a plain state machine
//! advanced by the host once per fixed tick:
//! - No I/O, no clocks (time is always passed in)
//! - No globals (the host owns a `RunState`)
//! - Snapshots are owned copies, never live references

pub mod boost;
pub mod combo;
pub mod demo;
pub mod state;
pub mod tick;
pub mod trick;

pub use boost::{BoostState, BoostSystem};
pub use combo::{ComboAward, ComboState, ComboSystem, ComboTier, ComboUpdate};
pub use demo::ScriptedRun;
pub use state::{RunState, RunSummary};
pub use tick::{TickEvents, TickInput, tick};
pub use trick::{Trick, TrickDetector, TrickKind, TrickState};
