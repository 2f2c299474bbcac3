use super::thruster_profile::ThrusterProfile;
use crate::flight_control::{
    ActuatorCommands,
    common::math::{shortest_rotation, within_deg, wrap_deg},
};

/// Orientation error below which the craft counts as aligned, in degrees.
pub(crate) const ROTATION_TOLERANCE: f64 = 1.0;

/// Turns the craft toward `dest` along the shorter arc.
///
/// Once aligned, a rotation requested earlier in the same tick is superseded by a hold.
///
/// # Returns
/// - `true` if the craft is already aligned.
pub(crate) fn orient(angle: f64, dest: f64, tol: f64, cmds: &mut ActuatorCommands) -> bool {
    if !angle.is_finite() {
        return false;
    }
    if within_deg(angle, dest, tol) {
        cmds.hold_attitude();
        true
    } else {
        cmds.rotate(shortest_rotation(wrap_deg(angle), wrap_deg(dest)));
        false
    }
}

/// Points the primary thruster along world `bearing` and fires it once aligned.
///
/// While the craft is still turning the primary thruster is held at zero, so no thrust is
/// ever spent in the wrong direction. The rotation is reissued every tick until it converges.
pub(crate) fn rotate_then_thrust(
    profile: &ThrusterProfile,
    angle: f64,
    bearing: f64,
    power: f64,
    cmds: &mut ActuatorCommands,
) {
    let dest = profile.orientation_for(bearing);
    if orient(angle, dest, ROTATION_TOLERANCE, cmds) {
        cmds.set_thrust(profile.primary, power);
    } else {
        cmds.set_thrust(profile.primary, 0.0);
    }
}
