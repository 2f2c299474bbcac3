use super::{
    control_mode::ControlMode,
    steering::{orient, rotate_then_thrust},
    thruster_profile::ThrusterProfile,
};
use crate::flight_control::{
    ActuatorCommands, NavState,
    common::{Vec2D, math::{wrap_deg, within_deg}},
    lander_io::SonarScan,
};
use crate::event;
use std::ops::Range;

/// Obstacle avoidance layered on top of guidance.
///
/// Runs after the guidance controller in the same tick and overwrites whatever command
/// buffer entries it sets. Close to the platform it stands down so the approach can finish.
#[derive(Debug, Clone, Copy)]
pub struct SafetyOverride {
    profile: &'static ThrusterProfile,
}

impl SafetyOverride {
    /// Lower bound on the reaction distance.
    const MIN_DIST_LIMIT: f64 = 75.0;
    /// Horizontal speed at which the full lateral reaction distance applies.
    const LATERAL_REFERENCE_SPEED: f64 = 5.0;
    /// Smallest fraction of the reaction distance used for lateral threats.
    const MIN_LATERAL_SCALE: f64 = 0.25;
    /// Vertical speed beyond which the craft counts as climbing or descending fast.
    const VERTICAL_SPEED_THRESHOLD: f64 = 5.0;
    /// Vertical speed above which a ground threat is handled by cutting thrust instead.
    const CLIMB_CUTOFF: f64 = 1.0;
    /// Tilt within which the exhaust-axis rangefinder looks straight down.
    const RANGEFINDER_TILT: f64 = 10.0;
    /// Tilt tolerated at touchdown inside the flare box.
    const TOUCHDOWN_TILT: f64 = 0.5;

    const RIGHT_SECTOR: Range<usize> = 5..14;
    const LEFT_SECTOR: Range<usize> = 22..32;
    const UP_SECTOR_FORWARD: Range<usize> = 0..5;
    const UP_SECTOR_BACKWARD: Range<usize> = 32..36;
    const DOWN_SECTOR_WIDE: Range<usize> = 12..25;
    const DOWN_SECTOR_NARROW: Range<usize> = 14..22;
    /// Threats at bearings beyond these are behind the direction of travel.
    const AHEAD_RIGHT_LIMIT: f64 = 140.0;
    const AHEAD_LEFT_LIMIT: f64 = 220.0;

    pub fn new(mode: ControlMode) -> Self { Self { profile: mode.profile() } }

    /// Distance within which terrain counts as a threat at the given velocity.
    pub fn dist_limit(vel: Vec2D<f64>) -> f64 { vel.abs_sq().max(Self::MIN_DIST_LIMIT) }

    /// Checks the ranging data and overwrites `cmds` where a collision threatens.
    ///
    /// # Arguments
    /// - `nav`: The navigation snapshot.
    /// - `platform`: The landing platform location.
    /// - `sonar`: The latest (possibly stale) sonar sweep.
    /// - `range_dist`: The exact distance along the exhaust axis, negative if nothing is hit.
    /// - `cmds`: The command buffer already filled by guidance.
    pub fn command(
        &self,
        nav: &NavState,
        platform: Vec2D<f64>,
        sonar: &SonarScan,
        range_dist: f64,
        cmds: &mut ActuatorCommands,
    ) {
        let p = self.profile;
        let offset = nav.offset_from(platform);
        let (dx, alt) = (offset.x(), offset.y());

        if p.proximity_box.contains(dx, alt) {
            if p.in_flare_box(dx, alt) && !within_deg(nav.angle, 0.0, Self::TOUCHDOWN_TILT) {
                cmds.set_thrust(p.primary, 0.0);
                orient(nav.angle, 0.0, Self::TOUCHDOWN_TILT, cmds);
            }
            return;
        }

        let dist_limit = Self::dist_limit(nav.vel);
        self.lateral_check(nav, dx, dist_limit, sonar, cmds);
        self.vertical_check(nav, dist_limit, sonar, range_dist, cmds);
    }

    fn lateral_check(&self, nav: &NavState, dx: f64, dist_limit: f64, sonar: &SonarScan, cmds: &mut ActuatorCommands) {
        let vx = nav.vel.x();
        if !vx.is_finite() {
            return;
        }
        let moving_right = vx > 0.0;
        let sector = if moving_right { Self::RIGHT_SECTOR } else { Self::LEFT_SECTOR };
        let Some(threat) = sonar.nearest(&[sector]) else { return };
        let scale = (vx.abs() / Self::LATERAL_REFERENCE_SPEED).clamp(Self::MIN_LATERAL_SCALE, 1.0);
        if threat.range >= dist_limit * scale || threat.range >= dist_limit.min(dx.abs()) {
            return;
        }
        let ahead = if moving_right {
            threat.bearing < Self::AHEAD_RIGHT_LIMIT
        } else {
            threat.bearing > Self::AHEAD_LEFT_LIMIT
        };
        event!("Lateral obstacle at {:.0}° in {:.1}, ahead: {ahead}", threat.bearing, threat.range);
        if ahead {
            rotate_then_thrust(self.profile, nav.angle, wrap_deg(threat.bearing + 180.0), 1.0, cmds);
        } else {
            cmds.set_thrust(self.profile.primary, 0.0);
        }
    }

    fn vertical_check(
        &self,
        nav: &NavState,
        dist_limit: f64,
        sonar: &SonarScan,
        range_dist: f64,
        cmds: &mut ActuatorCommands,
    ) {
        let vy = nav.vel.y();
        let nearest_in = |sectors: &[Range<usize>]| sonar.nearest(sectors).map(|r| r.range);
        let (sonar_min, downward) = if vy > Self::VERTICAL_SPEED_THRESHOLD {
            (nearest_in(&[Self::UP_SECTOR_FORWARD, Self::UP_SECTOR_BACKWARD]), false)
        } else if vy < -Self::VERTICAL_SPEED_THRESHOLD {
            (nearest_in(&[Self::DOWN_SECTOR_WIDE]), true)
        } else {
            (nearest_in(&[Self::DOWN_SECTOR_NARROW]), true)
        };
        let rangefinder = (downward && range_dist >= 0.0 && within_deg(nav.angle, 0.0, Self::RANGEFINDER_TILT))
            .then_some(range_dist);
        let nearest = match (sonar_min, rangefinder) {
            (Some(s), Some(r)) => Some(s.min(r)),
            (s, r) => s.or(r),
        };
        let Some(dmin) = nearest else { return };
        if dmin < dist_limit {
            let power = if vy > Self::CLIMB_CUTOFF { 0.0 } else { self.profile.ground_brake_power };
            event!("Vertical clearance {dmin:.1} below {dist_limit:.1}, lift power {power}");
            rotate_then_thrust(self.profile, nav.angle, 0.0, power, cmds);
        }
    }
}
