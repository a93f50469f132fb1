//! Hill Climb core demo
//!
//! Drives two scripted runs through the engine: the first is recorded as a
//! ghost, compressed to JSON and decoded again, the second races against it.
//!
//! Environment:
//! - `HILL_CLIMB_TUNING`: path to a tuning JSON file
//! - `RUST_LOG`: log filter (e.g. `info`, `hill_climb_core=debug`)

use std::path::PathBuf;
use std::rc::Rc;

use hill_climb_core::consts::SIM_DT_MS;
use hill_climb_core::ghost::{compress_ghost_run, decode_or_none};
use hill_climb_core::sim::{RunState, ScriptedRun, tick};
use hill_climb_core::Tuning;

const VEHICLE: &str = "jeep";
const STAGE: &str = "countryside";
/// Length of each scripted run (ticks)
const RUN_TICKS: u32 = 60 * 60;

fn main() {
    env_logger::init();
    log::info!("Hill Climb core (native demo) starting...");

    let tuning = std::env::var_os("HILL_CLIMB_TUNING")
        .map(|path| Tuning::load(&PathBuf::from(path)))
        .unwrap_or_default();

    // Run 1: record
    let mut first = RunState::new(&tuning, VEHICLE, STAGE);
    drive(&mut first, 7);
    let (first_summary, ghost) = first.finish();
    println!(
        "Run 1: {:.0} m, score {}, tricks {}, max combo x{}, {} ghost frames",
        first_summary.distance,
        first_summary.score,
        first_summary.total_trick_points,
        first_summary.max_combo,
        ghost.frames.len()
    );

    let json = match compress_ghost_run(&ghost).to_json() {
        Ok(json) => json,
        Err(e) => {
            log::error!("Failed to encode ghost: {}", e);
            return;
        }
    };
    let raw_len = serde_json::to_string(&ghost).map(|s| s.len()).unwrap_or(0);
    println!("Ghost JSON: {} bytes compressed, {} bytes raw", json.len(), raw_len);

    // Run 2: race the decoded ghost
    let mut second = RunState::new(&tuning, VEHICLE, STAGE);
    if let Some(decoded) = decode_or_none(&json) {
        second = second.with_ghost(Rc::new(decoded));
    }
    drive(&mut second, 11);
    let g = second.ghost.state();
    println!(
        "Run 2 vs ghost: distance delta {:+.1} m, time delta {}",
        -g.distance_delta,
        g.time_delta
            .map(|t| format!("{:+.0} ms", t))
            .unwrap_or_else(|| "ghost never got this far".to_string())
    );
    let (second_summary, _) = second.finish();
    println!(
        "Run 2: {:.0} m, score {}, tricks {}, max combo x{}",
        second_summary.distance,
        second_summary.score,
        second_summary.total_trick_points,
        second_summary.max_combo
    );
}

/// Feed a seeded scripted run through the engine
fn drive(state: &mut RunState, seed: u64) {
    let mut script = ScriptedRun::new(seed);
    for _ in 0..RUN_TICKS {
        let input = script.next_input(SIM_DT_MS);
        let events = tick(state, &input, SIM_DT_MS);

        for (trick, award) in events.tricks.iter().zip(&events.awards) {
            match award.tier_up {
                Some(tier) => log::info!(
                    "{} +{} ({} +{})",
                    trick.label,
                    award.points,
                    tier.label(),
                    award.tier_bonus
                ),
                None => log::info!("{} +{}", trick.label, award.points),
            }
        }
        if let Some(points) = events.combo_ended {
            log::info!("Combo banked: {} points", points);
        }
        if events.boost_started {
            log::debug!("Boost on ({:.0}%)", state.boost.percentage() * 100.0);
        }
    }
}
