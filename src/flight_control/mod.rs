//! The fault-tolerant flight-control core: sensor health monitoring, fallback estimation and
//! the flight computer tying them to the control laws in [`crate::mode_control`].

mod actuator_commands;
pub(crate) mod common;
pub(crate) mod estimation;
mod flight_computer;
mod flight_context;
pub(crate) mod health;
pub(crate) mod lander_io;

pub use actuator_commands::ActuatorCommands;
pub use flight_computer::{FlightComputer, TickReport};
pub use flight_context::{FlightContext, NavState};
