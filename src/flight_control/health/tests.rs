use super::{SensorHealth, SensorMonitor};
use crate::flight_control::{
    common::Vec2D,
    lander_io::{ActuatorHealth, LanderIo, Quantity, SonarScan},
};
use crate::info;
use crate::sim::{Component, FaultPlan, SimConfig, Simulator, Terrain};
use strum::IntoEnumIterator;

fn nominal_sim(seed: u64) -> Simulator {
    Simulator::new(SimConfig::new(seed), Terrain::flat(Vec2D::new(512.0, 1000.0)), Vec2D::new(512.0, 200.0))
}

/// Fixed readings, except for an angle that alternates across the 0°/360° seam.
struct SeamIo {
    flip: bool,
    velocity_x: f64,
    sonar: SonarScan,
}

impl SeamIo {
    fn new() -> Self { Self { flip: false, velocity_x: 1.0, sonar: SonarScan::blank() } }
}

impl LanderIo for SeamIo {
    fn velocity_x(&mut self) -> f64 { self.velocity_x }
    fn velocity_y(&mut self) -> f64 { -3.0 }
    fn position_x(&mut self) -> f64 { 100.0 }
    fn position_y(&mut self) -> f64 { 200.0 }
    fn angle(&mut self) -> f64 {
        self.flip = !self.flip;
        if self.flip { 359.5 } else { 0.5 }
    }
    fn range_dist(&mut self) -> f64 { -1.0 }
    fn sonar(&self) -> &SonarScan { &self.sonar }
    fn actuator_health(&self) -> ActuatorHealth { ActuatorHealth::ALL_OK }
    fn platform(&self) -> Vec2D<f64> { Vec2D::new(0.0, 0.0) }
    fn main_thruster(&mut self, _power: f64) {}
    fn left_thruster(&mut self, _power: f64) {}
    fn right_thruster(&mut self, _power: f64) {}
    fn rotate(&mut self, _angle: f64) {}
}

#[test]
fn test_clean_sensors_stay_healthy() {
    let monitor = SensorMonitor::default();
    let mut health = SensorHealth::new();
    let mut sim = nominal_sim(11);
    for _ in 0..500 {
        assert!(monitor.diagnose(&mut health, &mut sim).is_empty());
        sim.step();
    }
    assert!(Quantity::iter().all(|q| health.is_healthy(q)));
    assert_eq!(health.bits(), 0);
}

#[test]
fn test_faulty_sensor_is_condemned_and_latched() {
    info!("Running sensor condemnation latch test");
    let monitor = SensorMonitor::default();
    let mut health = SensorHealth::new();
    let mut sim = nominal_sim(5).with_faults(FaultPlan::immediate([Component::VelocityYSensor]));

    assert_eq!(monitor.diagnose(&mut health, &mut sim), vec![Quantity::VelocityY]);
    assert!(!health.is_healthy(Quantity::VelocityY));
    assert_eq!(health.condemned().collect::<Vec<_>>(), vec![Quantity::VelocityY]);

    sim.clear_sensor_faults();
    for _ in 0..50 {
        assert!(monitor.diagnose(&mut health, &mut sim).is_empty());
    }
    assert!(!health.is_healthy(Quantity::VelocityY));
    assert!(health.is_healthy(Quantity::VelocityX));
    assert_eq!(health.bits(), 1 << Quantity::VelocityY.index());
}

#[test]
fn test_every_sensor_fault_is_caught() {
    for (component, quantity) in [
        (Component::VelocityXSensor, Quantity::VelocityX),
        (Component::PositionXSensor, Quantity::PositionX),
        (Component::PositionYSensor, Quantity::PositionY),
        (Component::AngleSensor, Quantity::Angle),
    ] {
        let mut health = SensorHealth::new();
        let mut sim = nominal_sim(17).with_faults(FaultPlan::immediate([component]));
        assert_eq!(SensorMonitor::default().diagnose(&mut health, &mut sim), vec![quantity]);
    }
}

#[test]
fn test_threshold_above_trials_never_condemns() {
    let monitor = SensorMonitor::new().with_trials(25).with_fault_threshold(26);
    let mut health = SensorHealth::new();
    let mut sim = nominal_sim(2).with_faults(FaultPlan::immediate([Component::PositionXSensor]));
    for _ in 0..20 {
        assert!(monitor.diagnose(&mut health, &mut sim).is_empty());
    }
    assert!(health.is_healthy(Quantity::PositionX));
}

#[test]
fn test_zero_threshold_is_clamped() {
    let monitor = SensorMonitor::new().with_fault_threshold(0);
    let mut health = SensorHealth::new();
    let mut io = SeamIo::new();
    assert!(monitor.diagnose(&mut health, &mut io).is_empty());
}

#[test]
fn test_angle_seam_is_not_a_fault() {
    let monitor = SensorMonitor::default();
    let mut health = SensorHealth::new();
    let mut io = SeamIo::new();
    for _ in 0..10 {
        assert!(monitor.diagnose(&mut health, &mut io).is_empty());
    }
    assert!(health.is_healthy(Quantity::Angle));
}

#[test]
fn test_nan_reading_condemns() {
    let monitor = SensorMonitor::default();
    let mut health = SensorHealth::new();
    let mut io = SeamIo::new();
    io.velocity_x = f64::NAN;
    assert_eq!(monitor.diagnose(&mut health, &mut io), vec![Quantity::VelocityX]);
    assert!(monitor.diagnose(&mut health, &mut io).is_empty());
}

#[test]
fn test_condemn_reports_only_first_flip() {
    let mut health = SensorHealth::default();
    assert!(health.condemn(Quantity::Angle));
    assert!(!health.condemn(Quantity::Angle));
    assert_eq!(health.condemned().count(), 1);
}

#[test]
fn test_tolerances_per_quantity() {
    let monitor = SensorMonitor::default();
    assert!((monitor.tolerance(Quantity::VelocityX) - SensorMonitor::VELOCITY_TOLERANCE).abs() < f64::EPSILON);
    assert!((monitor.tolerance(Quantity::PositionY) - SensorMonitor::POSITION_TOLERANCE).abs() < f64::EPSILON);
    assert!((monitor.tolerance(Quantity::Angle) - SensorMonitor::ANGLE_TOLERANCE).abs() < f64::EPSILON);
}
