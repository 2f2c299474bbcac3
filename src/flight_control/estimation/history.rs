use crate::flight_control::{
    common::physics::{S_SCALE, T_STEP, displacement_per_tick},
    lander_io::Axis,
};

/// Rolling record of averaged position samples along one axis, most recent first.
///
/// The buffer is shifted in place every tick; it never grows or shrinks. A slot holding
/// [`HistoryBuffer::EMPTY_SLOT`] has not been populated yet (or received an unusable
/// sample) and is excluded from every estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryBuffer {
    axis: Axis,
    samples: [f64; Self::LEN],
}

impl HistoryBuffer {
    /// Number of retained samples.
    pub const LEN: usize = 22;
    /// Sentinel for a slot without a sample.
    pub const EMPTY_SLOT: f64 = 0.0;

    pub fn new(axis: Axis) -> Self { Self { axis, samples: [Self::EMPTY_SLOT; Self::LEN] } }

    pub fn axis(&self) -> Axis { self.axis }

    pub fn samples(&self) -> &[f64; Self::LEN] { &self.samples }

    /// The newest sample, if the front slot is populated.
    pub fn latest(&self) -> Option<f64> { Self::valid(self.samples[0]) }

    /// Shifts every sample one slot back, dropping the oldest, and stores `sample` in front.
    ///
    /// A non-finite sample is stored as [`HistoryBuffer::EMPTY_SLOT`] so that it cannot
    /// poison later estimates.
    pub fn push(&mut self, sample: f64) {
        self.samples.copy_within(0..Self::LEN - 1, 1);
        self.samples[0] = if sample.is_finite() { sample } else { Self::EMPTY_SLOT };
    }

    /// Estimates the velocity along this axis from the recorded positions.
    ///
    /// Sums the signed displacement of every pair of adjacent populated slots, averages over
    /// the number of pairs and converts the per-tick screen displacement into a physical
    /// velocity. On the y axis the sign is flipped, since screen y grows downward while
    /// vertical velocity is positive upward.
    ///
    /// # Returns
    /// - `Some(velocity)` once at least two adjacent slots are populated.
    /// - `None` while the buffer is still warming up.
    #[allow(clippy::cast_precision_loss)]
    pub fn estimate_velocity(&self) -> Option<f64> {
        let (sum, pairs) = self
            .samples
            .windows(2)
            .filter_map(|w| Some(Self::valid(w[0])? - Self::valid(w[1])?))
            .fold((0.0, 0usize), |(sum, n), d| (sum + d, n + 1));
        if pairs == 0 {
            return None;
        }
        Some(self.axis.screen_sign() * (sum / pairs as f64) / T_STEP / S_SCALE)
    }

    /// Dead-reckons the current position from the newest sample.
    ///
    /// # Arguments
    /// - `velocity`: The velocity along this axis to integrate over one tick.
    ///
    /// # Returns
    /// - `None` if there is no sample to start from.
    pub fn dead_reckon(&self, velocity: f64) -> Option<f64> {
        self.latest().map(|p| p + self.axis.screen_sign() * displacement_per_tick(velocity))
    }

    #[allow(clippy::float_cmp)]
    fn valid(sample: f64) -> Option<f64> { (sample != Self::EMPTY_SLOT).then_some(sample) }
}
