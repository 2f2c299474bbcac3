//! This module provides the control laws of the lander: the selection of the degraded
//! operating variant from thruster health, the profile-parameterised guidance toward the
//! platform and the obstacle-avoidance override layered on top of it.

mod control_mode;
mod guidance;
mod safety_override;
mod steering;
mod thruster_profile;
#[cfg(test)]
mod tests;

pub use control_mode::ControlMode;
pub use guidance::{GuidanceController, Push};
pub use safety_override::SafetyOverride;
pub use thruster_profile::{ThrusterProfile, VelocityBands};
