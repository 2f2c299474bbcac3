use crate::flight_control::{health::SensorHealth, lander_io::Quantity};
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::Display;

/// Where reads of a quantity are served from.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display)]
pub enum Source {
    /// The environment's sensor.
    Raw,
    /// The fallback estimator.
    Estimated,
}

/// Per-quantity choice between the raw sensor and its estimator.
///
/// Every quantity starts on [`Source::Raw`] and moves to [`Source::Estimated`] exactly once,
/// when its sensor is condemned. There is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimatorSelection {
    sources: [Source; Quantity::COUNT],
}

impl EstimatorSelection {
    pub fn new() -> Self { Self { sources: [Source::Raw; Quantity::COUNT] } }

    pub fn source(&self, quantity: Quantity) -> Source { self.sources[quantity.index()] }

    /// Rebinds every condemned quantity to its estimator.
    ///
    /// Idempotent and monotonic: quantities already on their estimator are left alone and a
    /// healthy flag never moves a quantity back to the raw sensor.
    ///
    /// # Returns
    /// - The quantities switched over by this call.
    pub fn update(&mut self, health: &SensorHealth) -> Vec<Quantity> {
        let switched: Vec<Quantity> = Quantity::iter()
            .filter(|q| !health.is_healthy(*q) && self.source(*q) == Source::Raw)
            .collect();
        for q in &switched {
            self.sources[q.index()] = Source::Estimated;
        }
        switched
    }
}

impl Default for EstimatorSelection {
    fn default() -> Self { Self::new() }
}
