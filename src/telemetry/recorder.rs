use super::flight_record::FlightRecord;
use crate::flight_control::TickReport;
use crate::info;
use bincode::error::{DecodeError, EncodeError};
use chrono::{DateTime, Utc};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};
use strum_macros::Display;

#[derive(Debug, Display)]
pub enum TelemetryError {
    #[strum(to_string = "flight log I/O failed: {0}")]
    Io(std::io::Error),
    #[strum(to_string = "flight log encoding failed: {0}")]
    Encode(EncodeError),
    #[strum(to_string = "flight log decoding failed: {0}")]
    Decode(DecodeError),
}

impl std::error::Error for TelemetryError {}

impl From<std::io::Error> for TelemetryError {
    fn from(value: std::io::Error) -> Self { TelemetryError::Io(value) }
}

impl From<EncodeError> for TelemetryError {
    fn from(value: EncodeError) -> Self { TelemetryError::Encode(value) }
}

impl From<DecodeError> for TelemetryError {
    fn from(value: DecodeError) -> Self { TelemetryError::Decode(value) }
}

/// Collects one [`FlightRecord`] per tick and persists them as a bincode flight log.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FlightRecorder {
    /// Wall-clock start of the recording, milliseconds since the Unix epoch.
    started_ms: i64,
    records: Vec<FlightRecord>,
}

impl FlightRecorder {
    pub fn new() -> Self { Self { started_ms: Utc::now().timestamp_millis(), records: Vec::new() } }

    pub fn record(&mut self, report: &TickReport) { self.records.push(FlightRecord::from(report)); }

    pub fn records(&self) -> &[FlightRecord] { &self.records }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Wall-clock start of the recording.
    pub fn started(&self) -> Option<DateTime<Utc>> { DateTime::from_timestamp_millis(self.started_ms) }

    /// Writes the whole log to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TelemetryError> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        let bytes = bincode::serde::encode_into_std_write(self, &mut writer, bincode::config::standard())?;
        writer.flush()?;
        info!("Saved {} flight records ({bytes} bytes) to {}", self.records.len(), path.as_ref().display());
        Ok(())
    }

    /// Reads a log written by [`FlightRecorder::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TelemetryError> {
        let mut reader = BufReader::new(File::open(path.as_ref())?);
        Ok(bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard())?)
    }
}

impl Default for FlightRecorder {
    fn default() -> Self { Self::new() }
}
