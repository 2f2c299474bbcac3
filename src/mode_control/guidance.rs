use super::{
    control_mode::ControlMode,
    steering::{ROTATION_TOLERANCE, orient, rotate_then_thrust},
    thruster_profile::ThrusterProfile,
};
use crate::flight_control::{
    ActuatorCommands, NavState,
    common::{
        Vec2D,
        math::{within_deg, wrap_deg},
        physics::{G_ACCEL, T_STEP},
    },
};
use strum_macros::Display;

/// World direction of a sideways push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Push {
    Left,
    Right,
}

impl Push {
    /// The push that moves a craft at horizontal offset `dx` toward the platform.
    fn toward(dx: f64) -> Self { if dx > 0.0 { Push::Left } else { Push::Right } }

    /// The push that opposes a horizontal velocity `vx`.
    fn against(vx: f64) -> Self { if vx > 0.0 { Push::Left } else { Push::Right } }

    fn reverse(self) -> Self {
        match self {
            Push::Left => Push::Right,
            Push::Right => Push::Left,
        }
    }

    /// World bearing of a thrust vector tilted `tilt` degrees off vertical in this direction.
    pub fn bearing(self, tilt: f64) -> f64 {
        match self {
            Push::Left => wrap_deg(-tilt),
            Push::Right => wrap_deg(tilt),
        }
    }
}

/// Drives the craft toward the platform with the primary thruster of one [`ControlMode`].
///
/// Vertical speed is kept above a distance-dependent descent limit and horizontal speed
/// toward the platform below a distance-dependent lateral limit. Both limits are eased ahead of
/// each band boundary so a braking craft enters the slower band already within it. While the
/// craft is still far from the platform horizontally compared to how soon it would reach the
/// ground, the descent is halted so the lateral approach can catch up.
///
/// Outside the proximity box the craft never descends below the box depth, and its horizontal
/// speed is capped so that braking to a stop stays possible in the altitude left.
///
/// A single thruster cannot brake the descent and push sideways at once. Descent braking
/// therefore fires along a bearing tilted toward the pending sideways push, and a craft already
/// tilted within the descent cone coasts on its current attitude instead of turning back to
/// vertical. On final approach, below [`Self::FLARE_ALTITUDE`] and horizontally within the
/// proximity box, every burn is made upright and neither push nor coupling applies.
#[derive(Debug, Clone, Copy)]
pub struct GuidanceController {
    profile: &'static ThrusterProfile,
}

impl GuidanceController {
    /// Horizontal-to-vertical time ratio above which descent is halted.
    const COUPLING_RATIO: f64 = 1.25;
    /// Altitude below which final approach begins.
    pub const FLARE_ALTITUDE: f64 = 30.0;
    /// Horizontal drift tolerated inside the dead-band.
    const DRIFT_TOLERANCE: f64 = 2.0;
    /// Hysteresis around the lateral limit.
    const LATERAL_MARGIN: f64 = 1.0;
    /// Share of the net upward acceleration set aside for slowing ahead of a band boundary.
    const BRAKING_SHARE: f64 = 0.5;
    /// Outside the proximity box the squared speed stays below this multiple of the altitude.
    const CLEARANCE_RATIO: f64 = 0.7;
    /// Tilt off vertical of a descent burn that also pushes sideways.
    pub const DESCENT_TILT: f64 = 30.0;
    /// Tilt off vertical of a sideways burn outside the dead-band.
    pub const LATERAL_TILT: f64 = 60.0;
    /// Tilt off vertical of a drift-cancelling burn inside the dead-band.
    pub const DRIFT_TILT: f64 = 30.0;

    pub fn new(mode: ControlMode) -> Self { Self { profile: mode.profile() } }

    pub fn profile(&self) -> &'static ThrusterProfile { self.profile }

    /// Fastest allowed descent speed at altitude `alt`.
    pub fn descent_limit(&self, alt: f64) -> f64 {
        let p = self.profile;
        p.descent.eased_limit(alt, Self::BRAKING_SHARE * (p.max_accel - G_ACCEL))
    }

    /// Whether the craft is low and close enough that only upright burns are made.
    fn on_final(&self, dx: f64, alt: f64) -> bool {
        alt <= Self::FLARE_ALTITUDE && dx.abs() < self.profile.proximity_box.half_width
    }

    /// Speed limits `(VXlim, VYlim)` for the current offset and velocity.
    ///
    /// `VYlim` is negative for a descent, zero where descent is halted.
    pub fn limits(&self, offset: Vec2D<f64>, vel: Vec2D<f64>) -> (f64, f64) {
        let p = self.profile;
        let (dx, alt) = (offset.x(), offset.y());
        let mut vx_lim = p.lateral.limit(dx);
        let mut vy_lim = -self.descent_limit(alt);
        // a zero speed yields an infinite time, 0/0 a NaN that never couples
        let lateral_time = dx.abs() / vel.x().abs();
        let vertical_time = alt.abs() / vel.y().abs();
        if dx.abs() > p.dead_band
            && !self.on_final(dx, alt)
            && lateral_time > Self::COUPLING_RATIO * vertical_time
        {
            vy_lim = 0.0;
            vx_lim = vx_lim.min(p.lateral.near);
        }
        if !p.proximity_box.contains(dx, alt) {
            if alt < p.proximity_box.depth {
                vy_lim = vy_lim.max(0.0);
            }
            vx_lim = vx_lim.min((Self::CLEARANCE_RATIO * alt - vy_lim * vy_lim).max(0.0).sqrt());
        }
        (vx_lim, vy_lim)
    }

    /// The sideways push this tick calls for, with the velocity change it should achieve.
    ///
    /// Inside the dead-band only drift faster than [`Self::DRIFT_TOLERANCE`] is opposed, and
    /// only above [`Self::FLARE_ALTITUDE`]. Outside, the speed toward the platform is held
    /// within [`Self::LATERAL_MARGIN`] of `vx_lim`. There is no push on final approach.
    pub fn lateral_push(&self, offset: Vec2D<f64>, vel: Vec2D<f64>, vx_lim: f64) -> Option<(Push, f64)> {
        let (dx, alt) = (offset.x(), offset.y());
        let vx = vel.x();
        if dx.abs() <= self.profile.dead_band {
            let drifting = alt > Self::FLARE_ALTITUDE && vx.abs() > Self::DRIFT_TOLERANCE;
            return drifting.then(|| (Push::against(vx), vx.abs()));
        }
        if self.on_final(dx, alt) {
            return None;
        }
        let toward = Push::toward(dx);
        let v_toward = if dx > 0.0 { -vx } else { vx };
        if v_toward < vx_lim - Self::LATERAL_MARGIN {
            Some((toward, vx_lim - v_toward))
        } else if v_toward > vx_lim + Self::LATERAL_MARGIN {
            Some((toward.reverse(), v_toward - vx_lim))
        } else {
            None
        }
    }

    /// Writes this tick's guidance commands into `cmds`.
    ///
    /// # Arguments
    /// - `nav`: The navigation snapshot, read through the estimator selection.
    /// - `platform`: The landing platform location.
    /// - `cmds`: The command buffer for this tick.
    pub fn command(&self, nav: &NavState, platform: Vec2D<f64>, cmds: &mut ActuatorCommands) {
        let p = self.profile;
        let offset = nav.offset_from(platform);
        let (dx, alt) = (offset.x(), offset.y());
        let (vx_lim, vy_lim) = self.limits(offset, nav.vel);
        let push = self.lateral_push(offset, nav.vel, vx_lim);
        let inside = dx.abs() <= p.dead_band;
        let upright_only = self.on_final(dx, alt) || (inside && alt <= Self::FLARE_ALTITUDE);
        let tilted = !upright_only && self.in_descent_cone(nav.angle);

        if nav.vel.y() < vy_lim {
            if p.in_flare_box(dx, alt) {
                cmds.set_thrust(p.primary, 0.0);
                return;
            }
            match push {
                _ if upright_only => rotate_then_thrust(p, nav.angle, 0.0, 1.0, cmds),
                None if tilted => {
                    cmds.set_thrust(p.primary, 1.0);
                    cmds.hold_attitude();
                }
                None => rotate_then_thrust(p, nav.angle, 0.0, 1.0, cmds),
                Some((dir, _)) => rotate_then_thrust(p, nav.angle, dir.bearing(Self::DESCENT_TILT), 1.0, cmds),
            }
            return;
        }
        cmds.set_thrust(p.primary, 0.0);

        match push {
            None if tilted && !inside => cmds.hold_attitude(),
            None => {
                orient(nav.angle, p.lift_orientation(), ROTATION_TOLERANCE, cmds);
            }
            Some((dir, dv)) => {
                let tilt = if inside { Self::DRIFT_TILT } else { Self::LATERAL_TILT };
                rotate_then_thrust(p, nav.angle, dir.bearing(tilt), self.power_for(dv), cmds);
            }
        }
    }

    /// Whether the primary thrust currently points within the descent cone around vertical.
    fn in_descent_cone(&self, angle: f64) -> bool {
        within_deg(wrap_deg(angle + self.profile.bearing_offset()), 0.0, Self::DESCENT_TILT + ROTATION_TOLERANCE)
    }

    /// Thrust power that removes `dv` of velocity within one tick, saturating at full power.
    fn power_for(&self, dv: f64) -> f64 { (dv / (self.profile.max_accel * T_STEP)).clamp(0.0, 1.0) }
}
