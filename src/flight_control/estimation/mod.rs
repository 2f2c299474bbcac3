//! Fallback estimators for condemned sensors and the selection between raw and estimated reads.

mod attitude;
mod history;
pub(crate) mod selection;

pub use attitude::AttitudeTracker;
pub use history::HistoryBuffer;
pub use selection::{EstimatorSelection, Source};
