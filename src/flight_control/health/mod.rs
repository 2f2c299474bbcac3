//! Sensor fault detection: latched per-sensor health flags and the monitor that sets them.

mod monitor;
mod sensor_health;
#[cfg(test)]
mod tests;

pub use monitor::SensorMonitor;
pub use sensor_health::SensorHealth;
