use super::thruster_profile::ThrusterProfile;
use crate::flight_control::lander_io::ActuatorHealth;
use strum_macros::{Display, EnumIter};

/// Operating variant of the control laws, derived from which thrusters still work.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, EnumIter, serde::Serialize, serde::Deserialize)]
pub enum ControlMode {
    Main,
    RightOnly,
    LeftOnly,
}

impl ControlMode {
    /// Selects the variant with priority main > right-only > left-only.
    ///
    /// # Returns
    /// - `None` if every thruster has failed.
    pub fn select(health: ActuatorHealth) -> Option<Self> {
        if health.main {
            Some(ControlMode::Main)
        } else if health.right {
            Some(ControlMode::RightOnly)
        } else if health.left {
            Some(ControlMode::LeftOnly)
        } else {
            None
        }
    }

    pub fn profile(self) -> &'static ThrusterProfile {
        match self {
            ControlMode::Main => &ThrusterProfile::MAIN,
            ControlMode::RightOnly => &ThrusterProfile::RIGHT_ONLY,
            ControlMode::LeftOnly => &ThrusterProfile::LEFT_ONLY,
        }
    }
}
