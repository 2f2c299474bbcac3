//! Reference environment the flight computer flies against: physics, sensor noise, terrain
//! and the command-line driven fault injection.

mod fault_selection;
mod simulator;
mod terrain;

pub use fault_selection::{Component, FailureMode, FaultPlan, FaultSelection, FaultSelectionError, ScheduledFault};
pub use simulator::{Outcome, SimConfig, Simulator};
pub use terrain::{Obstacle, Terrain};
