use super::{
    fault_selection::{Component, FaultPlan},
    terrain::Terrain,
};
use crate::flight_control::{
    common::{
        Vec2D,
        math::{within_deg, wrap_deg},
        physics::{G_ACCEL, LT_ACCEL, MT_ACCEL, RT_ACCEL, SONAR_BINS, T_STEP, displacement_per_tick, max_rotation_step},
    },
    lander_io::{ActuatorHealth, LanderIo, Quantity, SonarScan, Thruster},
};
use crate::warn;
use rand::{Rng, SeedableRng, rngs::StdRng};
use strum::EnumCount;
use strum_macros::Display;

/// Final state of a run once the craft touches something.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, serde::Serialize, serde::Deserialize)]
pub enum Outcome {
    Landed,
    Crashed,
}

/// Half-width of the uniform noise added to every read of a healthy sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseLevels {
    pub velocity: f64,
    pub position: f64,
    pub angle: f64,
    pub sonar: f64,
    /// Relative half-width of the multiplicative thrust noise.
    pub thrust: f64,
}

impl NoiseLevels {
    pub const NONE: NoiseLevels = NoiseLevels { velocity: 0.0, position: 0.0, angle: 0.0, sonar: 0.0, thrust: 0.0 };
    pub const NOMINAL: NoiseLevels =
        NoiseLevels { velocity: 0.5, position: 2.0, angle: 0.25, sonar: 2.0, thrust: 0.05 };
}

/// Tuning of the simulated environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    pub noise: NoiseLevels,
    /// Noise multiplier applied to a failed sensor.
    pub fault_noise_factor: f64,
    /// Ticks between two sonar sweeps.
    pub sonar_refresh: u64,
    pub sonar_range: f64,
    pub seed: u64,
}

impl SimConfig {
    pub const DEF_FAULT_NOISE_FACTOR: f64 = 40.0;
    pub const DEF_SONAR_REFRESH: u64 = 25;
    pub const DEF_SONAR_RANGE: f64 = 450.0;

    pub fn new(seed: u64) -> Self {
        Self {
            noise: NoiseLevels::NOMINAL,
            fault_noise_factor: Self::DEF_FAULT_NOISE_FACTOR,
            sonar_refresh: Self::DEF_SONAR_REFRESH,
            sonar_range: Self::DEF_SONAR_RANGE,
            seed,
        }
    }

    /// A configuration without any sensor, sonar or thrust noise.
    pub fn noiseless(seed: u64) -> Self { Self { noise: NoiseLevels::NONE, ..Self::new(seed) } }
}

/// Reference environment for the flight computer: point-mass physics over a [`Terrain`],
/// noisy sensors, rate-limited rotation and scheduled component failures.
#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimConfig,
    terrain: Terrain,
    rng: StdRng,
    pos: Vec2D<f64>,
    vel: Vec2D<f64>,
    angle: f64,
    pending_rotation: f64,
    power: [f64; 3],
    actuators: ActuatorHealth,
    failed_sensors: [bool; Quantity::COUNT],
    sonar_failed: bool,
    sonar: SonarScan,
    plan: FaultPlan,
    tick: u64,
    outcome: Option<Outcome>,
}

impl Simulator {
    /// Maximum vertical speed at touchdown, downward.
    pub const MAX_TOUCHDOWN_SPEED: f64 = 10.0;
    /// Maximum tilt at touchdown in degrees.
    pub const MAX_TOUCHDOWN_TILT: f64 = 15.0;

    /// Creates a craft at rest and upright at `start`.
    pub fn new(config: SimConfig, terrain: Terrain, start: Vec2D<f64>) -> Self {
        let mut sim = Self {
            config,
            terrain,
            rng: StdRng::seed_from_u64(config.seed),
            pos: start,
            vel: Vec2D::zero(),
            angle: 0.0,
            pending_rotation: 0.0,
            power: [0.0; 3],
            actuators: ActuatorHealth::ALL_OK,
            failed_sensors: [false; Quantity::COUNT],
            sonar_failed: false,
            sonar: SonarScan::blank(),
            plan: FaultPlan::default(),
            tick: 0,
            outcome: None,
        };
        sim.refresh_sonar();
        sim
    }

    pub fn with_velocity(mut self, vel: Vec2D<f64>) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = wrap_deg(angle);
        self
    }

    /// Schedules `plan`; faults due at tick zero take effect immediately.
    pub fn with_faults(mut self, plan: FaultPlan) -> Self {
        self.plan = plan;
        self.apply_due_faults();
        self
    }

    pub fn tick(&self) -> u64 { self.tick }
    pub fn outcome(&self) -> Option<Outcome> { self.outcome }
    pub fn true_position(&self) -> Vec2D<f64> { self.pos }
    pub fn true_velocity(&self) -> Vec2D<f64> { self.vel }
    pub fn true_angle(&self) -> f64 { self.angle }
    pub fn terrain(&self) -> &Terrain { &self.terrain }
    pub fn thrust_power(&self, thruster: Thruster) -> f64 { self.power[Self::slot(thruster)] }
    pub fn pending_rotation(&self) -> f64 { self.pending_rotation }

    /// Fails `component` from now on.
    pub fn fail(&mut self, component: Component) {
        if let Some(thruster) = component.thruster() {
            match thruster {
                Thruster::Main => self.actuators.main = false,
                Thruster::Left => self.actuators.left = false,
                Thruster::Right => self.actuators.right = false,
            }
            self.power[Self::slot(thruster)] = 0.0;
        } else if let Some(quantity) = component.quantity() {
            self.failed_sensors[quantity.index()] = true;
        } else {
            self.sonar_failed = true;
            self.sonar = SonarScan::blank();
        }
        warn!("Tick {}: {component} failed", self.tick);
    }

    /// Advances the physics by one tick.
    ///
    /// # Returns
    /// - The outcome once the craft has touched the ground or an obstacle.
    pub fn step(&mut self) -> Option<Outcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }
        self.apply_due_faults();

        let max_step = max_rotation_step();
        let rotation = self.pending_rotation.clamp(-max_step, max_step);
        self.angle = wrap_deg(self.angle + rotation);
        self.pending_rotation -= rotation;

        let mut accel = Vec2D::new(0.0, -G_ACCEL);
        for thruster in [Thruster::Main, Thruster::Left, Thruster::Right] {
            let power = self.power[Self::slot(thruster)];
            if power > 0.0 && self.actuators.is_ok(thruster) {
                let noise = 1.0 + self.uniform(self.config.noise.thrust);
                let bearing = self.angle + thruster.bearing_offset();
                accel = accel + Vec2D::from_bearing(bearing) * (Self::max_accel(thruster) * power * noise);
            }
        }
        self.vel = self.vel + accel * T_STEP;
        self.pos = Vec2D::new(
            self.pos.x() + displacement_per_tick(self.vel.x()),
            self.pos.y() - displacement_per_tick(self.vel.y()),
        );

        self.tick += 1;
        if self.tick % self.config.sonar_refresh.max(1) == 0 {
            self.refresh_sonar();
        }
        if self.terrain.in_contact(self.pos) {
            self.outcome = Some(self.judge_touchdown());
        }
        self.outcome
    }

    fn judge_touchdown(&self) -> Outcome {
        let on_platform = self.terrain.over_platform(self.pos.x()) && self.pos.y() >= self.terrain.ground_y();
        let gentle = self.vel.y() > -Self::MAX_TOUCHDOWN_SPEED;
        let upright = within_deg(self.angle, 0.0, Self::MAX_TOUCHDOWN_TILT);
        if on_platform && gentle && upright { Outcome::Landed } else { Outcome::Crashed }
    }

    fn apply_due_faults(&mut self) {
        for component in self.plan.take_due(self.tick) {
            self.fail(component);
        }
    }

    fn refresh_sonar(&mut self) {
        if self.sonar_failed {
            return;
        }
        let mut ranges = [SonarScan::INVALID; SONAR_BINS];
        for (i, slot) in ranges.iter_mut().enumerate() {
            if let Some(range) = self.terrain.ray_cast(self.pos, SonarScan::bearing(i), self.config.sonar_range) {
                *slot = (range + self.uniform(self.config.noise.sonar)).max(0.0);
            }
        }
        self.sonar = SonarScan::new(ranges);
    }

    fn noisy(&mut self, value: f64, quantity: Quantity, level: f64) -> f64 {
        let factor = if self.failed_sensors[quantity.index()] { self.config.fault_noise_factor } else { 1.0 };
        value + self.uniform(level * factor)
    }

    fn uniform(&mut self, half_width: f64) -> f64 {
        if half_width > 0.0 { self.rng.random_range(-half_width..=half_width) } else { 0.0 }
    }

    const fn slot(thruster: Thruster) -> usize {
        match thruster {
            Thruster::Main => 0,
            Thruster::Left => 1,
            Thruster::Right => 2,
        }
    }

    const fn max_accel(thruster: Thruster) -> f64 {
        match thruster {
            Thruster::Main => MT_ACCEL,
            Thruster::Left => LT_ACCEL,
            Thruster::Right => RT_ACCEL,
        }
    }

    fn set_power(&mut self, thruster: Thruster, power: f64) {
        if self.actuators.is_ok(thruster) {
            self.power[Self::slot(thruster)] = if power.is_finite() { power.clamp(0.0, 1.0) } else { 0.0 };
        }
    }
}

#[cfg(test)]
impl Simulator {
    /// Makes every failed sensor read cleanly again.
    pub(crate) fn clear_sensor_faults(&mut self) { self.failed_sensors = [false; Quantity::COUNT]; }
}

impl LanderIo for Simulator {
    fn velocity_x(&mut self) -> f64 {
        let level = self.config.noise.velocity;
        self.noisy(self.vel.x(), Quantity::VelocityX, level)
    }

    fn velocity_y(&mut self) -> f64 {
        let level = self.config.noise.velocity;
        self.noisy(self.vel.y(), Quantity::VelocityY, level)
    }

    fn position_x(&mut self) -> f64 {
        let level = self.config.noise.position;
        self.noisy(self.pos.x(), Quantity::PositionX, level)
    }

    fn position_y(&mut self) -> f64 {
        let level = self.config.noise.position;
        self.noisy(self.pos.y(), Quantity::PositionY, level)
    }

    fn angle(&mut self) -> f64 {
        let level = self.config.noise.angle;
        let reading = self.noisy(self.angle, Quantity::Angle, level);
        wrap_deg(reading)
    }

    fn range_dist(&mut self) -> f64 {
        self.terrain.ray_cast(self.pos, self.angle + 180.0, f64::INFINITY).unwrap_or(SonarScan::INVALID)
    }

    fn sonar(&self) -> &SonarScan { &self.sonar }

    fn actuator_health(&self) -> ActuatorHealth { self.actuators }

    fn platform(&self) -> Vec2D<f64> { self.terrain.platform() }

    fn main_thruster(&mut self, power: f64) { self.set_power(Thruster::Main, power); }

    fn left_thruster(&mut self, power: f64) { self.set_power(Thruster::Left, power); }

    fn right_thruster(&mut self, power: f64) { self.set_power(Thruster::Right, power); }

    fn rotate(&mut self, angle: f64) {
        if angle.is_finite() {
            self.pending_rotation = angle;
        }
    }
}
