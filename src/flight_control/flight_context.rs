use super::{
    common::{Vec2D, math::mean_of},
    estimation::{AttitudeTracker, EstimatorSelection, HistoryBuffer, Source},
    health::SensorHealth,
    lander_io::{Axis, LanderIo, Quantity},
};
use crate::{event, warn};

/// Navigation snapshot for one tick, every component read through the estimator selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavState {
    /// Screen position, y growing downward.
    pub pos: Vec2D<f64>,
    /// Velocity, y positive upward.
    pub vel: Vec2D<f64>,
    /// Orientation in degrees clockwise from vertical.
    pub angle: f64,
}

impl NavState {
    /// Offset of the craft relative to `platform`.
    ///
    /// # Returns
    /// A vector whose `x` is positive when the craft is right of the platform and whose `y`
    /// is the altitude above the platform (positive while the craft is above it).
    pub fn offset_from(&self, platform: Vec2D<f64>) -> Vec2D<f64> {
        Vec2D::new(self.pos.x() - platform.x(), platform.y() - self.pos.y())
    }
}

/// All flight-computer state shared between the components of one control tick.
///
/// The sensor health is written only by the monitor, the estimator selection only by its
/// update, the history only by [`FlightContext::update_history`]. Everything else reads.
#[derive(Debug, Clone)]
pub struct FlightContext {
    health: SensorHealth,
    selection: EstimatorSelection,
    history_x: HistoryBuffer,
    history_y: HistoryBuffer,
    attitude: AttitudeTracker,
    platform: Vec2D<f64>,
}

impl FlightContext {
    pub fn new(platform: Vec2D<f64>) -> Self {
        Self {
            health: SensorHealth::new(),
            selection: EstimatorSelection::new(),
            history_x: HistoryBuffer::new(Axis::X),
            history_y: HistoryBuffer::new(Axis::Y),
            attitude: AttitudeTracker::new(),
            platform,
        }
    }

    pub fn health(&self) -> &SensorHealth { &self.health }
    pub fn health_mut(&mut self) -> &mut SensorHealth { &mut self.health }
    pub fn selection(&self) -> &EstimatorSelection { &self.selection }
    pub fn attitude(&self) -> &AttitudeTracker { &self.attitude }
    pub fn platform(&self) -> Vec2D<f64> { self.platform }

    pub fn history(&self, axis: Axis) -> &HistoryBuffer {
        match axis {
            Axis::X => &self.history_x,
            Axis::Y => &self.history_y,
        }
    }

    fn history_mut(&mut self, axis: Axis) -> &mut HistoryBuffer {
        match axis {
            Axis::X => &mut self.history_x,
            Axis::Y => &mut self.history_y,
        }
    }

    /// Applies the latest health verdicts to the estimator selection.
    ///
    /// # Returns
    /// - The quantities that switched to their estimator during this call.
    pub fn update_selection(&mut self) -> Vec<Quantity> {
        let switched = self.selection.update(&self.health);
        if switched.contains(&Quantity::Angle) && !self.attitude.is_seeded() {
            warn!("Angle sensor lost before any trusted reading, assuming upright attitude");
        }
        switched
    }

    /// Appends one averaged position sample per axis to the history.
    ///
    /// Each sample is the mean of `samples` reads through the currently active position
    /// source, which averages out the uncorrelated sensor noise.
    ///
    /// A dead-reckoning estimator cannot answer before its history holds a sample. Until it
    /// can, the history is seeded with the mean of `samples` raw reads of the condemned
    /// sensor: its noise is wide but still centred on the true position.
    pub fn update_history(&mut self, io: &mut impl LanderIo, samples: usize) {
        for axis in [Axis::X, Axis::Y] {
            let quantity = Quantity::position(axis);
            let mut sample = mean_of(samples, || self.read(quantity, io));
            if !sample.is_finite() && self.selection.source(quantity) == Source::Estimated {
                sample = mean_of(samples, || io.read(quantity));
                warn!("Seeding {quantity} history from {samples} reads of its condemned sensor: {sample:.1}");
            }
            if !sample.is_finite() {
                event!("No usable {quantity} sample this tick");
            }
            self.history_mut(axis).push(sample);
        }
    }

    /// Reads `quantity` from whichever source is currently selected for it.
    ///
    /// Estimators may not be able to answer yet (an empty history right after a sensor was
    /// condemned). In that case `NaN` is returned, every comparison against it is false and
    /// the control laws treat it as "no action".
    pub fn read(&self, quantity: Quantity, io: &mut impl LanderIo) -> f64 {
        match self.selection.source(quantity) {
            Source::Raw => io.read(quantity),
            Source::Estimated => self.estimate(quantity, io),
        }
    }

    fn estimate(&self, quantity: Quantity, io: &mut impl LanderIo) -> f64 {
        match quantity {
            Quantity::VelocityX => self.history_x.estimate_velocity(),
            Quantity::VelocityY => self.history_y.estimate_velocity(),
            Quantity::PositionX => {
                let velocity = self.read(Quantity::VelocityX, io);
                self.history_x.dead_reckon(velocity)
            }
            Quantity::PositionY => {
                let velocity = self.read(Quantity::VelocityY, io);
                self.history_y.dead_reckon(velocity)
            }
            Quantity::Angle => Some(self.attitude.angle()),
        }
        .unwrap_or(f64::NAN)
    }

    /// Takes the navigation snapshot for this tick.
    ///
    /// A trusted angle reading also re-anchors the attitude tracker.
    pub fn nav_state(&mut self, io: &mut impl LanderIo) -> NavState {
        let pos = Vec2D::new(self.read(Quantity::PositionX, io), self.read(Quantity::PositionY, io));
        let vel = Vec2D::new(self.read(Quantity::VelocityX, io), self.read(Quantity::VelocityY, io));
        let angle = self.read(Quantity::Angle, io);
        if self.selection.source(Quantity::Angle) == Source::Raw {
            self.attitude.observe(angle);
        }
        NavState { pos, vel, angle }
    }

    /// Integrates the rotation applied this tick into the attitude estimate.
    pub fn advance_attitude(&mut self, rotation: Option<f64>) { self.attitude.advance(rotation); }
}
