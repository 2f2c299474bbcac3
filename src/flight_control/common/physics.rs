//! Physical constants shared between the flight-control core and the simulated environment.

/// Gravitational acceleration (Venus).
pub const G_ACCEL: f64 = 8.87;
/// Maximum acceleration provided by the main thruster.
pub const MT_ACCEL: f64 = 35.0;
/// Maximum acceleration provided by the right thruster.
pub const RT_ACCEL: f64 = 25.0;
/// Maximum acceleration provided by the left thruster.
pub const LT_ACCEL: f64 = 25.0;
/// Maximum rotation per tick, in radians.
pub const MAX_ROT_RATE: f64 = 0.075;
/// Simulation time step in seconds.
pub const T_STEP: f64 = 0.005;
/// Spatial scale: screen units per meter.
pub const S_SCALE: f64 = 5.0;
/// Number of sonar bins, 10° apart, clockwise from vertical.
pub const SONAR_BINS: usize = 36;

/// Maximum rotation per tick, in degrees.
pub fn max_rotation_step() -> f64 { MAX_ROT_RATE.to_degrees() }

/// Screen displacement covered in one tick at the given velocity.
pub fn displacement_per_tick(velocity: f64) -> f64 { velocity * T_STEP * S_SCALE }
