use super::common::{Vec2D, physics::SONAR_BINS};
use std::ops::Range;
use strum_macros::{Display, EnumCount, EnumIter};

/// The sensed quantities the flight computer relies on.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, EnumIter, EnumCount)]
pub enum Quantity {
    VelocityX,
    VelocityY,
    PositionX,
    PositionY,
    Angle,
}

impl Quantity {
    /// The velocity quantity along `axis`.
    pub fn velocity(axis: Axis) -> Self {
        match axis {
            Axis::X => Quantity::VelocityX,
            Axis::Y => Quantity::VelocityY,
        }
    }

    /// The position quantity along `axis`.
    pub fn position(axis: Axis) -> Self {
        match axis {
            Axis::X => Quantity::PositionX,
            Axis::Y => Quantity::PositionY,
        }
    }

    /// Index into per-quantity tables.
    pub const fn index(self) -> usize { self as usize }
}

/// Screen axis.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, EnumIter)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Sign converting a physical (upward-positive) velocity into screen displacement.
    ///
    /// Screen y grows downward, so a positive vertical velocity decreases the y position.
    pub const fn screen_sign(self) -> f64 {
        match self {
            Axis::X => 1.0,
            Axis::Y => -1.0,
        }
    }
}

/// The three thrusters of the lander.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, EnumIter, serde::Serialize, serde::Deserialize)]
pub enum Thruster {
    Main,
    Left,
    Right,
}

impl Thruster {
    /// Bearing of the thrust vector relative to the craft orientation, clockwise in degrees.
    ///
    /// The main engine pushes along the craft's vertical axis, the right thruster pushes
    /// toward the craft's left side and the left thruster toward its right side.
    pub const fn bearing_offset(self) -> f64 {
        match self {
            Thruster::Main => 0.0,
            Thruster::Left => 90.0,
            Thruster::Right => -90.0,
        }
    }
}

/// Operational state of the thrusters, as reported by the environment.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, serde::Serialize, serde::Deserialize)]
pub struct ActuatorHealth {
    pub main: bool,
    pub left: bool,
    pub right: bool,
}

impl ActuatorHealth {
    pub const ALL_OK: ActuatorHealth = ActuatorHealth { main: true, left: true, right: true };

    pub fn is_ok(&self, thruster: Thruster) -> bool {
        match thruster {
            Thruster::Main => self.main,
            Thruster::Left => self.left,
            Thruster::Right => self.right,
        }
    }
}

/// A single valid sonar return.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct SonarReturn {
    /// Bearing of the bin in degrees, clockwise from vertical.
    pub bearing: f64,
    /// Measured distance.
    pub range: f64,
}

/// One sweep of the sonar array: 36 ranges at 10° increments clockwise from vertical.
///
/// Entries below zero (the sentinel is `-1`) carry no valid reading. The array is refreshed
/// slower than the control loop runs, readings may therefore be stale.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct SonarScan {
    ranges: [f64; SONAR_BINS],
}

impl SonarScan {
    /// Sentinel marking an invalid reading.
    pub const INVALID: f64 = -1.0;
    /// Angular width of one bin in degrees.
    pub const BIN_WIDTH: f64 = 10.0;

    pub const fn new(ranges: [f64; SONAR_BINS]) -> Self { Self { ranges } }

    /// A scan without a single valid reading.
    pub const fn blank() -> Self { Self { ranges: [Self::INVALID; SONAR_BINS] } }

    pub fn ranges(&self) -> &[f64; SONAR_BINS] { &self.ranges }

    /// Returns the range of bin `i` if it holds a valid reading.
    pub fn get(&self, i: usize) -> Option<f64> {
        self.ranges.get(i).copied().filter(|r| *r > Self::INVALID)
    }

    /// Bearing of bin `i` in degrees.
    #[allow(clippy::cast_precision_loss)]
    pub fn bearing(i: usize) -> f64 { i as f64 * Self::BIN_WIDTH }

    /// Finds the closest valid return among the given bin ranges.
    ///
    /// # Arguments
    /// - `sectors`: Half-open bin index ranges to inspect.
    ///
    /// # Returns
    /// - `Some(SonarReturn)` for the nearest valid reading, `None` if all bins are invalid.
    pub fn nearest(&self, sectors: &[Range<usize>]) -> Option<SonarReturn> {
        sectors
            .iter()
            .flat_map(Clone::clone)
            .filter_map(|i| self.get(i).map(|range| SonarReturn { bearing: Self::bearing(i), range }))
            .min_by(|a, b| a.range.total_cmp(&b.range))
    }
}

impl Default for SonarScan {
    fn default() -> Self { Self::blank() }
}

/// The environment the flight computer senses and actuates through.
///
/// Sensor reads take `&mut self` because every call draws a fresh, independently noisy
/// sample. Actuator commands are advisory: the environment applies its own noise and rate
/// limits, and a thruster setting persists until it is commanded again.
pub trait LanderIo {
    /// Horizontal velocity, positive to the right.
    fn velocity_x(&mut self) -> f64;
    /// Vertical velocity, positive upward.
    fn velocity_y(&mut self) -> f64;
    /// Horizontal screen position.
    fn position_x(&mut self) -> f64;
    /// Vertical screen position, growing downward.
    fn position_y(&mut self) -> f64;
    /// Orientation in degrees clockwise from vertical, `[0, 360)`.
    fn angle(&mut self) -> f64;
    /// Exact distance to terrain along the main-thruster exhaust axis, `-1` if nothing is in range.
    fn range_dist(&mut self) -> f64;
    /// Latest sonar sweep.
    fn sonar(&self) -> &SonarScan;
    /// Operational state of the thrusters.
    fn actuator_health(&self) -> ActuatorHealth;
    /// Exact location of the landing platform.
    fn platform(&self) -> Vec2D<f64>;

    fn main_thruster(&mut self, power: f64);
    fn left_thruster(&mut self, power: f64);
    fn right_thruster(&mut self, power: f64);
    /// Requests a rotation by `angle` degrees from the current orientation, clockwise positive.
    fn rotate(&mut self, angle: f64);

    /// Reads the raw sensor for `quantity`.
    fn read(&mut self, quantity: Quantity) -> f64 {
        match quantity {
            Quantity::VelocityX => self.velocity_x(),
            Quantity::VelocityY => self.velocity_y(),
            Quantity::PositionX => self.position_x(),
            Quantity::PositionY => self.position_y(),
            Quantity::Angle => self.angle(),
        }
    }

    /// Sets the power of `thruster`.
    fn thrust(&mut self, thruster: Thruster, power: f64) {
        match thruster {
            Thruster::Main => self.main_thruster(power),
            Thruster::Left => self.left_thruster(power),
            Thruster::Right => self.right_thruster(power),
        }
    }
}
