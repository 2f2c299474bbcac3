//! Per-tick flight telemetry and its on-disk flight log.

mod flight_record;
mod recorder;

pub use flight_record::FlightRecord;
pub use recorder::{FlightRecorder, TelemetryError};
