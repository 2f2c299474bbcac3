#![allow(dead_code, clippy::similar_names)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod flight_control;
mod logger;
mod mission;
mod mode_control;
mod sim;
mod telemetry;

use crate::flight_control::{FlightComputer, common::Vec2D};
use crate::mission::{MissionOptions, run_mission};
use crate::sim::{FaultSelection, Outcome, SimConfig, Simulator, Terrain};
use itertools::Itertools;
use rand::{SeedableRng, rngs::StdRng};
use std::env;
use tokio_util::sync::CancellationToken;

#[cfg(all(feature = "profiling", not(target_env = "msvc")))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

const PLATFORM: Vec2D<f64> = Vec2D::new(512.0, 1000.0);
const START_POS: Vec2D<f64> = Vec2D::new(512.0, 200.0);
const START_VEL: Vec2D<f64> = Vec2D::new(0.0, -5.0);

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() {
    let selection = FaultSelection::from_args(env::args().skip(1))
        .unwrap_or_else(|e| fatal!("{e}. Usage: lander-fc <mode 0-3> [components 1-9..]"));
    let seed = env::var("LANDER_SEED").ok().and_then(|s| s.trim().parse::<u64>().ok()).unwrap_or_else(rand::random);
    let options = MissionOptions::from_env();
    info!("Failure mode {} with seed {seed}", selection.mode());

    let mut rng = StdRng::seed_from_u64(seed);
    let plan = selection.resolve(&mut rng);
    for fault in plan.faults() {
        info!("{} scheduled to fail at tick {}", fault.component, fault.onset);
    }
    let mut sim = Simulator::new(SimConfig::new(seed), Terrain::flat(PLATFORM), START_POS)
        .with_velocity(START_VEL)
        .with_faults(plan);
    let mut computer = FlightComputer::new(&sim).with_average_samples(options.average_samples);

    let c_tok = CancellationToken::new();
    let c_tok_clone = c_tok.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, aborting mission");
            c_tok_clone.cancel();
        }
    });

    let summary = run_mission(&mut sim, &mut computer, options, c_tok).await;
    let condemned = if summary.condemned.is_empty() {
        String::from("none")
    } else {
        summary.condemned.iter().join(", ")
    };
    let mode = summary.last_mode.map_or_else(|| String::from("none"), |m| m.to_string());
    match summary.outcome {
        Some(Outcome::Landed) => info!(
            "Landed after {} ticks at vy {:.2} (mode {mode}, condemned sensors: {condemned})",
            summary.ticks,
            sim.true_velocity().y()
        ),
        Some(Outcome::Crashed) => warn!(
            "Crashed after {} ticks at {:.1} with velocity {:.1} (mode {mode}, condemned sensors: {condemned})",
            summary.ticks,
            sim.true_position(),
            sim.true_velocity()
        ),
        None => warn!("Mission ended without touchdown after {} ticks", summary.ticks),
    }
}
