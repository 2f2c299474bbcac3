//! The reference mission loop flying a [`FlightComputer`] against the [`Simulator`].


use crate::flight_control::{FlightComputer, common::physics::T_STEP, lander_io::Quantity};
use crate::mode_control::ControlMode;
use crate::sim::{Outcome, Simulator};
use crate::telemetry::FlightRecorder;
use crate::{error, info, warn};
use std::{env, path::PathBuf, str::FromStr, time::Duration};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Deployment knobs of a mission run, usually taken from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionOptions {
    /// Pace ticks at `T_STEP` wall-clock instead of running flat out.
    pub realtime: bool,
    /// Ticks after which the mission is given up.
    pub max_ticks: u64,
    /// Reads averaged into one history sample.
    pub average_samples: usize,
    /// Where to write the flight log, if anywhere.
    pub flight_log: Option<PathBuf>,
}

impl MissionOptions {
    pub const DEF_MAX_TICKS: u64 = 200_000;

    /// Reads `LANDER_REALTIME`, `LANDER_MAX_TICKS`, `LANDER_AVG_SAMPLES` and `LANDER_FLIGHT_LOG`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            realtime: env::var("LANDER_REALTIME").is_ok_and(|v| !v.is_empty() && v != "0"),
            max_ticks: Self::parsed("LANDER_MAX_TICKS").unwrap_or(defaults.max_ticks),
            average_samples: Self::parsed("LANDER_AVG_SAMPLES").unwrap_or(defaults.average_samples),
            flight_log: env::var_os("LANDER_FLIGHT_LOG").filter(|v| !v.is_empty()).map(PathBuf::from),
        }
    }

    fn parsed<T: FromStr>(name: &str) -> Option<T> {
        let raw = env::var(name).ok()?;
        let value = raw.trim().parse().ok();
        if value.is_none() {
            warn!("Ignoring unparsable {name}='{raw}'");
        }
        value
    }
}

impl Default for MissionOptions {
    fn default() -> Self {
        Self {
            realtime: false,
            max_ticks: Self::DEF_MAX_TICKS,
            average_samples: FlightComputer::DEF_AVERAGE_SAMPLES,
            flight_log: None,
        }
    }
}

/// How a mission ended.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionSummary {
    /// The touchdown verdict, `None` if the mission was cancelled or ran out of ticks.
    pub outcome: Option<Outcome>,
    pub ticks: u64,
    pub condemned: Vec<Quantity>,
    pub last_mode: Option<ControlMode>,
    pub cancelled: bool,
}

/// Flies the mission until touchdown, the tick limit or cancellation.
///
/// Every tick runs the flight computer, records its report and advances the simulator. With
/// `options.realtime` the ticks are paced at `T_STEP`, otherwise the loop yields to the runtime
/// between ticks. The flight log is written once the loop ends.
pub async fn run_mission(
    sim: &mut Simulator,
    computer: &mut FlightComputer,
    options: MissionOptions,
    c_tok: CancellationToken,
) -> MissionSummary {
    let mut recorder = FlightRecorder::new();
    let mut pace = options.realtime.then(|| {
        let mut interval = tokio::time::interval(Duration::from_secs_f64(T_STEP));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval
    });
    let mut cancelled = false;

    let outcome = loop {
        if sim.tick() >= options.max_ticks {
            warn!("No touchdown after {} ticks, giving up", sim.tick());
            break None;
        }
        if let Some(interval) = pace.as_mut() {
            tokio::select! {
                biased;
                () = c_tok.cancelled() => {
                    cancelled = true;
                    break None;
                }
                _ = interval.tick() => {}
            }
        } else if c_tok.is_cancelled() {
            cancelled = true;
            break None;
        } else {
            tokio::task::yield_now().await;
        }
        let report = computer.tick(sim);
        recorder.record(&report);
        if let Some(outcome) = sim.step() {
            break Some(outcome);
        }
    };
    if cancelled {
        warn!("Mission cancelled at tick {}", sim.tick());
    }

    if let Some(path) = options.flight_log.as_ref() {
        if let Err(e) = recorder.save(path) {
            error!("Could not write flight log to {}: {e}", path.display());
        }
    }
    let summary = MissionSummary {
        outcome,
        ticks: sim.tick(),
        condemned: computer.context().health().condemned().collect(),
        last_mode: computer.mode(),
        cancelled,
    };
    info!("Mission ended after {} ticks with {} flight records", summary.ticks, recorder.len());
    summary
}
