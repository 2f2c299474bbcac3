use crate::flight_control::common::{
    math::wrap_deg,
    physics::max_rotation_step,
};

/// Fallback orientation estimate for when the angle sensor can no longer be trusted.
///
/// The tracker mirrors how the environment executes rotation requests: a request replaces
/// whatever rotation is still pending, and at most [`max_rotation_step`] degrees are turned
/// per tick. While the angle sensor is healthy the tracker is re-seeded from its readings
/// every tick, afterwards it integrates the commanded rotations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttitudeTracker {
    angle: f64,
    pending: f64,
    seeded: bool,
}

impl AttitudeTracker {
    /// Starts upright with nothing pending and no trusted reading yet.
    pub fn new() -> Self { Self { angle: 0.0, pending: 0.0, seeded: false } }

    /// Current orientation estimate in degrees, `[0, 360)`.
    pub fn angle(&self) -> f64 { self.angle }

    /// Whether the estimate was ever anchored to a trusted reading.
    pub fn is_seeded(&self) -> bool { self.seeded }

    /// Anchors the estimate to a trusted angle reading.
    pub fn observe(&mut self, angle: f64) {
        if angle.is_finite() {
            self.angle = wrap_deg(angle);
            self.seeded = true;
        }
    }

    /// Advances the estimate by one tick.
    ///
    /// # Arguments
    /// - `request`: The rotation issued this tick, if any. It replaces the pending remainder.
    pub fn advance(&mut self, request: Option<f64>) {
        if let Some(delta) = request.filter(|d| d.is_finite()) {
            self.pending = delta;
        }
        let max_step = max_rotation_step();
        let step = self.pending.clamp(-max_step, max_step);
        self.angle = wrap_deg(self.angle + step);
        self.pending -= step;
    }
}

impl Default for AttitudeTracker {
    fn default() -> Self { Self::new() }
}
