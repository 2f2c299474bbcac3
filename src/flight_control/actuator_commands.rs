use super::lander_io::{LanderIo, Thruster};

/// The actuator settings decided during one control tick.
///
/// `None` leaves the corresponding actuator untouched, the environment keeps the previously
/// commanded power. Later writes in the same tick overwrite earlier ones, which is how the
/// safety override supersedes guidance.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct ActuatorCommands {
    pub main: Option<f64>,
    pub left: Option<f64>,
    pub right: Option<f64>,
    pub rotation: Option<f64>,
}

impl ActuatorCommands {
    pub fn new() -> Self { Self::default() }

    /// Sets `thruster` to `power`, clamped to `[0, 1]`.
    pub fn set_thrust(&mut self, thruster: Thruster, power: f64) {
        let power = power.clamp(0.0, 1.0);
        match thruster {
            Thruster::Main => self.main = Some(power),
            Thruster::Left => self.left = Some(power),
            Thruster::Right => self.right = Some(power),
        }
    }

    pub fn thrust(&self, thruster: Thruster) -> Option<f64> {
        match thruster {
            Thruster::Main => self.main,
            Thruster::Left => self.left,
            Thruster::Right => self.right,
        }
    }

    /// Requests a rotation by `delta` degrees, clockwise positive.
    pub fn rotate(&mut self, delta: f64) { self.rotation = Some(delta); }

    /// Keeps the current attitude.
    ///
    /// A rotation requested earlier in this tick is replaced by a zero rotation, which also
    /// stops any turn still in progress. Without an earlier request nothing is issued.
    pub fn hold_attitude(&mut self) {
        if self.rotation.is_some() {
            self.rotation = Some(0.0);
        }
    }

    /// Zeroes every thruster and drops any rotation request.
    pub fn cut_all(&mut self) {
        *self = Self { main: Some(0.0), left: Some(0.0), right: Some(0.0), rotation: None };
    }

    /// Whether nothing was commanded at all.
    pub fn is_empty(&self) -> bool {
        self.main.is_none() && self.left.is_none() && self.right.is_none() && self.rotation.is_none()
    }

    /// Forwards every set command to the environment.
    pub fn apply(&self, io: &mut impl LanderIo) {
        for thruster in [Thruster::Main, Thruster::Left, Thruster::Right] {
            if let Some(power) = self.thrust(thruster) {
                io.thrust(thruster, power);
            }
        }
        if let Some(delta) = self.rotation {
            io.rotate(delta);
        }
    }
}
