use super::sensor_health::SensorHealth;
use crate::flight_control::lander_io::{LanderIo, Quantity};
use crate::{event, warn};
use strum::IntoEnumIterator;

/// Magnitude-based fault discriminator for the lander's sensors.
///
/// Two back-to-back reads observe the same true value, so their difference is pure noise.
/// Nominal noise stays well below the per-quantity tolerance; an injected malfunction (bias
/// jumps or inflated variance) does not. A sensor is condemned as soon as `fault_threshold`
/// of the `trials` paired reads in a tick disagree by more than the tolerance.
#[derive(Debug, Clone, Copy)]
pub struct SensorMonitor {
    trials: usize,
    fault_threshold: usize,
    velocity_tolerance: f64,
    position_tolerance: f64,
    angle_tolerance: f64,
}

impl SensorMonitor {
    /// Paired reads per sensor and tick.
    pub const TRIALS: usize = 25;
    /// Exceeding trials needed to condemn a sensor.
    pub const FAULT_THRESHOLD: usize = 1;
    pub const VELOCITY_TOLERANCE: f64 = 5.0;
    pub const POSITION_TOLERANCE: f64 = 50.0;
    pub const ANGLE_TOLERANCE: f64 = 5.0;

    pub fn new() -> Self {
        Self {
            trials: Self::TRIALS,
            fault_threshold: Self::FAULT_THRESHOLD,
            velocity_tolerance: Self::VELOCITY_TOLERANCE,
            position_tolerance: Self::POSITION_TOLERANCE,
            angle_tolerance: Self::ANGLE_TOLERANCE,
        }
    }

    /// Overrides the number of paired reads per tick.
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    /// Overrides the number of exceeding trials needed to condemn a sensor.
    pub fn with_fault_threshold(mut self, threshold: usize) -> Self {
        self.fault_threshold = threshold.max(1);
        self
    }

    /// Accepted difference between two back-to-back reads of `quantity`.
    pub fn tolerance(&self, quantity: Quantity) -> f64 {
        match quantity {
            Quantity::VelocityX | Quantity::VelocityY => self.velocity_tolerance,
            Quantity::PositionX | Quantity::PositionY => self.position_tolerance,
            Quantity::Angle => self.angle_tolerance,
        }
    }

    /// Runs one diagnostic pass over every sensor that is still trusted.
    ///
    /// Condemned sensors are never sampled again. The only side effect is on `health`.
    ///
    /// # Arguments
    /// - `health`: The latched health flags to update.
    /// - `io`: The environment providing the raw sensor reads.
    ///
    /// # Returns
    /// - The quantities condemned during this pass.
    pub fn diagnose(&self, health: &mut SensorHealth, io: &mut impl LanderIo) -> Vec<Quantity> {
        let mut condemned = Vec::new();
        for quantity in Quantity::iter() {
            if !health.is_healthy(quantity) {
                continue;
            }
            let tol = self.tolerance(quantity);
            let exceeding = (0..self.trials)
                .filter(|_| {
                    let first = io.read(quantity);
                    let second = io.read(quantity);
                    Self::disagree(quantity, first, second, tol)
                })
                .count();
            if exceeding >= self.fault_threshold && health.condemn(quantity) {
                warn!("{quantity} sensor condemned: {exceeding}/{} paired reads beyond ±{tol}", self.trials);
                condemned.push(quantity);
            } else if exceeding > 0 {
                event!("{quantity}: {exceeding} paired reads beyond ±{tol}");
            }
        }
        condemned
    }

    fn disagree(quantity: Quantity, first: f64, second: f64, tol: f64) -> bool {
        let diff = if quantity == Quantity::Angle {
            // 359.9° and 0.1° are neighbours, not a 359.8° jump
            let raw = (first - second).abs() % 360.0;
            raw.min(360.0 - raw)
        } else {
            (first - second).abs()
        };
        // a NaN reading is as untrustworthy as a wild one
        diff.is_nan() || diff > tol
    }
}

impl Default for SensorMonitor {
    fn default() -> Self { Self::new() }
}
