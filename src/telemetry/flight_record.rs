use crate::flight_control::{ActuatorCommands, TickReport, common::Vec2D};
use crate::mode_control::ControlMode;

/// What the flight computer saw and did during one tick.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FlightRecord {
    pub tick: u64,
    pub pos: Vec2D<f64>,
    pub vel: Vec2D<f64>,
    pub angle: f64,
    pub mode: Option<ControlMode>,
    /// Condemned-sensor bits, see [`crate::flight_control::health::SensorHealth::bits`].
    pub condemned: u8,
    pub commands: ActuatorCommands,
}

impl From<&TickReport> for FlightRecord {
    fn from(report: &TickReport) -> Self {
        Self {
            tick: report.tick,
            pos: report.nav.pos,
            vel: report.nav.vel,
            angle: report.nav.angle,
            mode: report.mode,
            condemned: report.condemned,
            commands: report.commands,
        }
    }
}
