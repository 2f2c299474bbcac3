use super::{
    ActuatorCommands, FlightContext, NavState,
    health::SensorMonitor,
    lander_io::LanderIo,
};
use crate::mode_control::{ControlMode, GuidanceController, SafetyOverride};
use crate::{error, event, info};

/// Everything the flight computer decided during one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub nav: NavState,
    pub mode: Option<ControlMode>,
    pub condemned: u8,
    pub commands: ActuatorCommands,
}

/// The lander's flight-control core.
///
/// Owns the [`FlightContext`] and runs the full control pipeline once per tick against any
/// [`LanderIo`] environment: sensor diagnosis, estimator selection, history update, navigation
/// snapshot, mode selection, guidance and the safety override. The tick never blocks and never
/// fails; degraded hardware only changes which data and laws are used.
#[derive(Debug)]
pub struct FlightComputer {
    context: FlightContext,
    monitor: SensorMonitor,
    average_samples: usize,
    ticks: u64,
    mode: Option<ControlMode>,
    last_commands: ActuatorCommands,
    safety_enabled: bool,
}

impl FlightComputer {
    /// Default number of reads averaged into one history sample.
    pub const DEF_AVERAGE_SAMPLES: usize = 1000;

    /// Creates a flight computer targeting the platform reported by `io`.
    pub fn new(io: &impl LanderIo) -> Self {
        Self {
            context: FlightContext::new(io.platform()),
            monitor: SensorMonitor::default(),
            average_samples: Self::DEF_AVERAGE_SAMPLES,
            ticks: 0,
            mode: None,
            last_commands: ActuatorCommands::new(),
            safety_enabled: true,
        }
    }

    /// Overrides the number of reads averaged into one history sample (at least one).
    pub fn with_average_samples(mut self, samples: usize) -> Self {
        self.average_samples = samples.max(1);
        self
    }

    pub fn with_monitor(mut self, monitor: SensorMonitor) -> Self {
        self.monitor = monitor;
        self
    }

    /// Switches the obstacle-avoidance layer on or off; with it off guidance flies alone.
    pub fn with_safety(mut self, enabled: bool) -> Self {
        self.safety_enabled = enabled;
        self
    }

    pub fn context(&self) -> &FlightContext { &self.context }
    pub fn ticks(&self) -> u64 { self.ticks }
    pub fn mode(&self) -> Option<ControlMode> { self.mode }
    pub fn last_commands(&self) -> &ActuatorCommands { &self.last_commands }

    /// Runs one control cycle and applies the resulting commands to `io`.
    pub fn tick(&mut self, io: &mut impl LanderIo) -> TickReport {
        let condemned = self.monitor.diagnose(self.context.health_mut(), io);
        if !condemned.is_empty() {
            event!("Tick {}: condemned {condemned:?}", self.ticks);
        }
        for quantity in self.context.update_selection() {
            info!("{quantity} is now served by its estimator");
        }
        self.context.update_history(io, self.average_samples);
        let nav = self.context.nav_state(io);

        let mode = ControlMode::select(io.actuator_health());
        self.log_mode_change(mode);

        let mut cmds = ActuatorCommands::new();
        match mode {
            Some(mode) => {
                let platform = self.context.platform();
                GuidanceController::new(mode).command(&nav, platform, &mut cmds);
                if self.safety_enabled {
                    let range_dist = io.range_dist();
                    let sonar = *io.sonar();
                    SafetyOverride::new(mode).command(&nav, platform, &sonar, range_dist, &mut cmds);
                }
            }
            None => cmds.cut_all(),
        }
        cmds.apply(io);
        self.context.advance_attitude(cmds.rotation);

        let report = TickReport {
            tick: self.ticks,
            nav,
            mode,
            condemned: self.context.health().bits(),
            commands: cmds,
        };
        self.last_commands = cmds;
        self.mode = mode;
        self.ticks += 1;
        report
    }

    fn log_mode_change(&self, mode: Option<ControlMode>) {
        if self.ticks > 0 && mode == self.mode {
            return;
        }
        match mode {
            Some(m) => info!("Tick {}: flying in {m} mode", self.ticks),
            None => error!("Tick {}: every thruster has failed, cutting all thrust", self.ticks),
        }
    }
}
