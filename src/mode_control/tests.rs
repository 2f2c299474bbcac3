use super::{
    ControlMode, GuidanceController, Push, SafetyOverride, ThrusterProfile, VelocityBands,
    steering::{ROTATION_TOLERANCE, orient, rotate_then_thrust},
};
use crate::flight_control::{
    ActuatorCommands, NavState,
    common::{Vec2D, physics::SONAR_BINS},
    lander_io::{ActuatorHealth, SonarScan, Thruster},
};
use crate::info;
use strum::IntoEnumIterator;

const PLATFORM: Vec2D<f64> = Vec2D::new(512.0, 900.0);

fn nav_at(dx: f64, alt: f64, vel: (f64, f64), angle: f64) -> NavState {
    NavState {
        pos: Vec2D::new(PLATFORM.x() + dx, PLATFORM.y() - alt),
        vel: Vec2D::new(vel.0, vel.1),
        angle,
    }
}

fn scan_with(bins: &[(usize, f64)]) -> SonarScan {
    let mut ranges = [SonarScan::INVALID; SONAR_BINS];
    for (i, r) in bins {
        ranges[*i] = *r;
    }
    SonarScan::new(ranges)
}

fn guide(mode: ControlMode, nav: &NavState) -> ActuatorCommands {
    let mut cmds = ActuatorCommands::new();
    GuidanceController::new(mode).command(nav, PLATFORM, &mut cmds);
    cmds
}

fn close(value: Option<f64>, expected: f64) -> bool { value.is_some_and(|v| (v - expected).abs() < 1e-6) }

#[test]
fn test_mode_priority() {
    let health = |main, left, right| ActuatorHealth { main, left, right };
    assert_eq!(ControlMode::select(ActuatorHealth::ALL_OK), Some(ControlMode::Main));
    assert_eq!(ControlMode::select(health(true, false, false)), Some(ControlMode::Main));
    assert_eq!(ControlMode::select(health(false, true, true)), Some(ControlMode::RightOnly));
    assert_eq!(ControlMode::select(health(false, false, true)), Some(ControlMode::RightOnly));
    assert_eq!(ControlMode::select(health(false, true, false)), Some(ControlMode::LeftOnly));
    assert_eq!(ControlMode::select(health(false, false, false)), None);
}

#[test]
fn test_profile_orientations() {
    let lift: Vec<(ControlMode, f64)> = ControlMode::iter().map(|m| (m, m.profile().lift_orientation())).collect();
    info!("Lift orientations: {lift:?}");
    assert!((ThrusterProfile::MAIN.lift_orientation()).abs() < 1e-9);
    assert!((ThrusterProfile::RIGHT_ONLY.lift_orientation() - 90.0).abs() < 1e-9);
    assert!((ThrusterProfile::LEFT_ONLY.lift_orientation() - 270.0).abs() < 1e-9);
    assert!((ThrusterProfile::RIGHT_ONLY.orientation_for(270.0)).abs() < 1e-9);
    assert_eq!(ControlMode::RightOnly.profile().primary, Thruster::Right);
    assert!(ThrusterProfile::MAIN.flare_box.is_none());
    assert!(!ThrusterProfile::MAIN.in_flare_box(0.0, 0.0));
    assert!(ThrusterProfile::LEFT_ONLY.in_flare_box(-10.0, 5.0));
}

#[test]
fn test_velocity_bands() {
    let bands = VelocityBands { far: 15.0, mid: 10.0, near: 5.0 };
    assert!((bands.limit(-250.0) - 15.0).abs() < 1e-9);
    assert!((bands.limit(200.0) - 10.0).abs() < 1e-9);
    assert!((bands.limit(150.0) - 10.0).abs() < 1e-9);
    assert!((bands.limit(100.0) - 5.0).abs() < 1e-9);
    assert!((bands.limit(0.0) - 5.0).abs() < 1e-9);
}

#[test]
fn test_eased_bands_meet_each_boundary() {
    let bands = ThrusterProfile::MAIN.descent;
    let decel = 0.5 * (35.0 - 8.87);
    // exactly on a boundary the slower band applies already
    assert!((bands.eased_limit(200.0, decel) - 10.0).abs() < 1e-9);
    assert!((bands.eased_limit(100.0, decel) - 4.0).abs() < 1e-9);
    // just above, the limit rises continuously from the slower band
    let above = bands.eased_limit(250.0, decel);
    assert!((above - (100.0 + 2.0 * decel * 50.0 / 5.0_f64).sqrt()).abs() < 1e-9);
    assert!(above > 10.0 && above < 20.0);
    assert!(bands.eased_limit(110.0, decel) < 10.0);
    // far above, the plain band is reached
    assert!((bands.eased_limit(1000.0, decel) - 20.0).abs() < 1e-9);
    assert!((bands.eased_limit(-1000.0, decel) - 20.0).abs() < 1e-9);
    for d in [0.0, 50.0, 101.0, 150.0, 201.0, 400.0] {
        assert!(bands.eased_limit(d, decel) <= bands.limit(d));
    }
}

#[test]
fn test_push_bearings() {
    assert!((Push::Right.bearing(60.0) - 60.0).abs() < 1e-9);
    assert!((Push::Left.bearing(60.0) - 300.0).abs() < 1e-9);
    assert!((Push::Left.bearing(0.0)).abs() < 1e-9);
}

#[test]
fn test_limits_and_coupling() {
    let guidance = GuidanceController::new(ControlMode::Main);
    let (vx_lim, vy_lim) = guidance.limits(Vec2D::new(0.0, 1000.0), Vec2D::new(0.0, -10.0));
    assert!((vx_lim - 5.0).abs() < 1e-9);
    assert!((vy_lim + 20.0).abs() < 1e-9);

    // far off to the side and about to reach the ground: descent halted
    let (vx_lim, vy_lim) = guidance.limits(Vec2D::new(300.0, 1000.0), Vec2D::new(-1.0, -10.0));
    assert!((vx_lim - 5.0).abs() < 1e-9);
    assert!(vy_lim.abs() < 1e-9);

    // fast enough laterally: no coupling
    let (vx_lim, vy_lim) = guidance.limits(Vec2D::new(300.0, 1000.0), Vec2D::new(-15.0, -10.0));
    assert!((vx_lim - 15.0).abs() < 1e-9);
    assert!((vy_lim + 20.0).abs() < 1e-9);

    // hovering still: both times infinite, no coupling
    let (vx_lim, vy_lim) = guidance.limits(Vec2D::new(300.0, 1000.0), Vec2D::new(0.0, 0.0));
    assert!((vx_lim - 15.0).abs() < 1e-9);
    assert!((vy_lim + 20.0).abs() < 1e-9);

    // descent limit eased ahead of the mid band
    let (_, vy_lim) = guidance.limits(Vec2D::new(0.0, 250.0), Vec2D::new(0.0, 0.0));
    assert!((vy_lim + guidance.descent_limit(250.0)).abs() < 1e-9);
    assert!(vy_lim > -20.0 && vy_lim < -10.0);
}

#[test]
fn test_limits_outside_proximity_box() {
    let guidance = GuidanceController::new(ControlMode::Main);
    // fast descent at 500 above the platform leaves no room for lateral speed
    let (vx_lim, vy_lim) = guidance.limits(Vec2D::new(0.0, 500.0), Vec2D::new(0.0, -10.0));
    assert!(vx_lim.abs() < 1e-9);
    assert!((vy_lim + 20.0).abs() < 1e-9);

    // below the box depth but off to the side: no descent, lateral speed capped by altitude
    let (vx_lim, vy_lim) = guidance.limits(Vec2D::new(300.0, 100.0), Vec2D::new(-15.0, -2.0));
    assert!(vy_lim.abs() < 1e-9);
    assert!((vx_lim - 70.0_f64.sqrt()).abs() < 1e-9);

    // inside the box the plain limits apply
    let (vx_lim, vy_lim) = guidance.limits(Vec2D::new(60.0, 100.0), Vec2D::new(0.0, 0.0));
    assert!((vx_lim - 5.0).abs() < 1e-9);
    assert!((vy_lim + 4.0).abs() < 1e-9);
}

#[test]
fn test_no_coupling_on_final_approach() {
    let guidance = GuidanceController::new(ControlMode::Main);
    // lateral time infinite, vertical time 2 s: would couple anywhere else
    let (vx_lim, vy_lim) = guidance.limits(Vec2D::new(60.0, 20.0), Vec2D::new(0.0, -10.0));
    assert!((vx_lim - 5.0).abs() < 1e-9);
    assert!((vy_lim + 4.0).abs() < 1e-9);

    let (_, vy_lim) = guidance.limits(Vec2D::new(60.0, 40.0), Vec2D::new(0.0, -10.0));
    assert!(vy_lim.abs() < 1e-9);
}

#[test]
fn test_lateral_push() {
    let guidance = GuidanceController::new(ControlMode::Main);
    let vel = |vx| Vec2D::new(vx, 0.0);
    assert_eq!(guidance.lateral_push(Vec2D::new(300.0, 500.0), vel(0.0), 15.0), Some((Push::Left, 15.0)));
    assert_eq!(guidance.lateral_push(Vec2D::new(-300.0, 500.0), vel(0.0), 15.0), Some((Push::Right, 15.0)));
    assert_eq!(guidance.lateral_push(Vec2D::new(300.0, 500.0), vel(-14.5), 15.0), None);
    assert_eq!(guidance.lateral_push(Vec2D::new(300.0, 500.0), vel(-18.0), 15.0), Some((Push::Right, 3.0)));
    assert_eq!(guidance.lateral_push(Vec2D::new(10.0, 500.0), vel(1.5), 5.0), None);
    assert_eq!(guidance.lateral_push(Vec2D::new(10.0, 500.0), vel(3.0), 5.0), Some((Push::Left, 3.0)));
    assert_eq!(guidance.lateral_push(Vec2D::new(10.0, 20.0), vel(3.0), 5.0), None);
    assert_eq!(guidance.lateral_push(Vec2D::new(60.0, 20.0), vel(0.0), 5.0), None);
    // low but outside the proximity box: still pushed toward the platform
    assert_eq!(guidance.lateral_push(Vec2D::new(300.0, 20.0), vel(0.0), 15.0), Some((Push::Left, 15.0)));
}

#[test]
fn test_fast_descent_over_platform_fires_main() {
    let cmds = guide(ControlMode::Main, &nav_at(0.0, 500.0, (0.0, -25.0), 0.0));
    assert!(close(cmds.main, 1.0));
    assert_eq!(cmds.left, None);
    assert_eq!(cmds.right, None);
    assert_eq!(cmds.rotation, None);
}

#[test]
fn test_slow_descent_over_platform_idles() {
    let cmds = guide(ControlMode::Main, &nav_at(0.0, 500.0, (0.0, -5.0), 0.0));
    assert!(close(cmds.main, 0.0));
    assert_eq!(cmds.rotation, None);
}

#[test]
fn test_drift_inside_dead_band_is_opposed() {
    let cmds = guide(ControlMode::Main, &nav_at(10.0, 500.0, (4.0, -5.0), 0.0));
    assert!(close(cmds.main, 0.0));
    assert!(close(cmds.rotation, -GuidanceController::DRIFT_TILT));
}

#[test]
fn test_no_lateral_correction_below_flare_altitude() {
    let cmds = guide(ControlMode::Main, &nav_at(10.0, 20.0, (4.0, -1.0), 0.0));
    assert!(close(cmds.main, 0.0));
    assert_eq!(cmds.rotation, None);
}

#[test]
fn test_side_thruster_turns_before_pushing() {
    // right of the platform, hovering, right thruster pointing down
    let cmds = guide(ControlMode::RightOnly, &nav_at(300.0, 500.0, (0.0, 0.0), 90.0));
    assert!(close(cmds.right, 0.0));
    assert!(close(cmds.rotation, -GuidanceController::LATERAL_TILT));
    assert_eq!(cmds.main, None);
}

#[test]
fn test_side_thruster_pushes_once_aligned() {
    let nav = nav_at(300.0, 500.0, (0.0, 0.0), 30.0);
    let cmds = guide(ControlMode::RightOnly, &nav);
    assert!(close(cmds.right, 1.0));
    assert_eq!(cmds.rotation, None);
}

#[test]
fn test_tilted_descent_brake() {
    let cmds = guide(ControlMode::RightOnly, &nav_at(300.0, 500.0, (0.0, -20.0), 90.0));
    assert!(close(cmds.right, 0.0));
    assert!(close(cmds.rotation, -GuidanceController::DESCENT_TILT));

    let cmds = guide(ControlMode::RightOnly, &nav_at(300.0, 500.0, (0.0, -20.0), 60.0));
    assert!(close(cmds.right, 1.0));
    assert_eq!(cmds.rotation, None);
}

#[test]
fn test_coasting_keeps_attitude() {
    let cmds = guide(ControlMode::RightOnly, &nav_at(300.0, 1000.0, (-14.5, -3.0), 80.0));
    assert!(close(cmds.right, 0.0));
    assert_eq!(cmds.rotation, None);

    // outside the cone the lift orientation is restored
    let cmds = guide(ControlMode::RightOnly, &nav_at(300.0, 1000.0, (-14.5, -3.0), 30.0));
    assert!(close(cmds.rotation, 60.0));
}

#[test]
fn test_tilted_descent_inside_dead_band() {
    let cmds = guide(ControlMode::Main, &nav_at(10.0, 500.0, (0.0, -25.0), 20.0));
    assert!(close(cmds.main, 1.0));
    assert_eq!(cmds.rotation, None);

    // below the flare altitude the same burn is made upright
    let cmds = guide(ControlMode::Main, &nav_at(10.0, 20.0, (0.0, -25.0), 20.0));
    assert!(close(cmds.main, 0.0));
    assert!(close(cmds.rotation, -20.0));
}

#[test]
fn test_final_approach_is_upright() {
    // beside the dead-band, low, descending slowly: no push, attitude already upright
    let cmds = guide(ControlMode::RightOnly, &nav_at(30.0, 20.0, (0.0, -0.5), 90.0));
    assert!(close(cmds.right, 0.0));
    assert_eq!(cmds.rotation, None);

    // descending too fast from a tilt: turn upright before braking
    let cmds = guide(ControlMode::RightOnly, &nav_at(30.0, 20.0, (0.0, -5.0), 60.0));
    assert!(close(cmds.right, 0.0));
    assert!(close(cmds.rotation, 30.0));
}

#[test]
fn test_low_side_craft_keeps_pushing_outside_proximity_box() {
    let cmds = guide(ControlMode::RightOnly, &nav_at(80.0, 40.0, (0.0, 0.0), 90.0));
    assert!(close(cmds.right, 0.0));
    assert!(close(cmds.rotation, -GuidanceController::LATERAL_TILT));

    let cmds = guide(ControlMode::LeftOnly, &nav_at(-80.0, 40.0, (0.0, 0.0), 270.0));
    assert!(close(cmds.left, 0.0));
    assert!(close(cmds.rotation, GuidanceController::LATERAL_TILT));
}

#[test]
fn test_descent_braked_below_box_depth_off_to_the_side() {
    let cmds = guide(ControlMode::Main, &nav_at(300.0, 100.0, (0.0, -2.0), 0.0));
    assert!(close(cmds.main, 0.0));
    assert!(close(cmds.rotation, -GuidanceController::DESCENT_TILT));
}

#[test]
fn test_flare_box_cuts_side_thrust() {
    let cmds = guide(ControlMode::LeftOnly, &nav_at(10.0, 10.0, (0.0, -5.0), 270.0));
    assert!(close(cmds.left, 0.0));
    assert_eq!(cmds.rotation, None);
}

#[test]
fn test_unknown_attitude_holds_fire() {
    let cmds = guide(ControlMode::Main, &nav_at(0.0, 500.0, (0.0, -25.0), f64::NAN));
    assert!(close(cmds.main, 0.0));
    assert_eq!(cmds.rotation, None);
}

#[test]
fn test_orient_holds_when_aligned() {
    let mut cmds = ActuatorCommands::new();
    assert!(orient(10.5, 10.0, ROTATION_TOLERANCE, &mut cmds));
    assert_eq!(cmds.rotation, None);

    cmds.rotate(45.0);
    assert!(orient(10.5, 10.0, ROTATION_TOLERANCE, &mut cmds));
    assert!(close(cmds.rotation, 0.0));

    assert!(!orient(350.0, 10.0, ROTATION_TOLERANCE, &mut cmds));
    assert!(close(cmds.rotation, 20.0));

    let mut cmds = ActuatorCommands::new();
    rotate_then_thrust(&ThrusterProfile::LEFT_ONLY, 180.0, 90.0, 0.5, &mut cmds);
    assert!(close(cmds.left, 0.0));
    assert!(close(cmds.rotation, 180.0) || close(cmds.rotation, -180.0));
}

#[test]
fn test_safety_stands_down_near_platform() {
    let safety = SafetyOverride::new(ControlMode::Main);
    let mut cmds = ActuatorCommands::new();
    let sonar = scan_with(&[(18, 5.0), (9, 5.0)]);
    safety.command(&nav_at(0.0, 100.0, (8.0, -8.0), 0.0), PLATFORM, &sonar, 5.0, &mut cmds);
    assert!(cmds.is_empty());
}

#[test]
fn test_safety_uprights_side_craft_for_touchdown() {
    let safety = SafetyOverride::new(ControlMode::RightOnly);
    let mut cmds = ActuatorCommands::new();
    cmds.set_thrust(Thruster::Right, 1.0);
    safety.command(&nav_at(5.0, 10.0, (0.0, -2.0), 5.0), PLATFORM, &SonarScan::blank(), -1.0, &mut cmds);
    assert!(close(cmds.right, 0.0));
    assert!(close(cmds.rotation, -5.0));
}

#[test]
fn test_safety_evades_obstacle_ahead() {
    let safety = SafetyOverride::new(ControlMode::Main);
    let mut cmds = ActuatorCommands::new();
    cmds.set_thrust(Thruster::Main, 1.0);
    let sonar = scan_with(&[(9, 50.0)]);
    safety.command(&nav_at(-500.0, 500.0, (10.0, 0.0), 0.0), PLATFORM, &sonar, -1.0, &mut cmds);
    assert!(close(cmds.main, 0.0));
    assert!(close(cmds.rotation, -90.0));
}

#[test]
fn test_safety_skips_lateral_check_without_horizontal_velocity() {
    let safety = SafetyOverride::new(ControlMode::Main);
    let mut cmds = ActuatorCommands::new();
    cmds.set_thrust(Thruster::Main, 1.0);
    let sonar = scan_with(&[(27, 10.0), (9, 10.0)]);
    safety.command(&nav_at(-500.0, 500.0, (f64::NAN, 0.0), 0.0), PLATFORM, &sonar, -1.0, &mut cmds);
    assert!(close(cmds.main, 1.0));
    assert_eq!(cmds.rotation, None);
}

#[test]
fn test_safety_ignores_obstacle_behind() {
    let safety = SafetyOverride::new(ControlMode::Main);
    let mut cmds = ActuatorCommands::new();
    cmds.set_thrust(Thruster::Main, 1.0);
    let sonar = scan_with(&[(22, 30.0)]);
    safety.command(&nav_at(500.0, 500.0, (-10.0, 0.0), 0.0), PLATFORM, &sonar, -1.0, &mut cmds);
    assert!(close(cmds.main, 0.0));
    assert_eq!(cmds.rotation, None);
}

#[test]
fn test_safety_brakes_above_ground() {
    let safety = SafetyOverride::new(ControlMode::Main);
    let mut cmds = ActuatorCommands::new();
    let sonar = scan_with(&[(18, 40.0)]);
    safety.command(&nav_at(-500.0, 500.0, (0.0, -8.0), 0.0), PLATFORM, &sonar, -1.0, &mut cmds);
    assert!(close(cmds.main, 1.0));
    assert_eq!(cmds.rotation, None);
}

#[test]
fn test_safety_uses_rangefinder_only_when_upright() {
    let safety = SafetyOverride::new(ControlMode::Main);
    let mut cmds = ActuatorCommands::new();
    safety.command(&nav_at(-500.0, 500.0, (0.0, -2.0), 0.0), PLATFORM, &SonarScan::blank(), 30.0, &mut cmds);
    assert!(close(cmds.main, 1.0));

    let mut cmds = ActuatorCommands::new();
    safety.command(&nav_at(-500.0, 500.0, (0.0, -2.0), 45.0), PLATFORM, &SonarScan::blank(), 30.0, &mut cmds);
    assert!(cmds.is_empty());
}

#[test]
fn test_safety_cuts_thrust_when_climbing_into_ceiling() {
    let safety = SafetyOverride::new(ControlMode::Main);
    let mut cmds = ActuatorCommands::new();
    cmds.set_thrust(Thruster::Main, 1.0);
    let sonar = scan_with(&[(0, 20.0)]);
    safety.command(&nav_at(-500.0, 500.0, (0.0, 8.0), 0.0), PLATFORM, &sonar, -1.0, &mut cmds);
    assert!(close(cmds.main, 0.0));
}

#[test]
fn test_safety_idle_with_blank_sonar() {
    let safety = SafetyOverride::new(ControlMode::LeftOnly);
    let mut cmds = ActuatorCommands::new();
    safety.command(&nav_at(-500.0, 500.0, (10.0, -10.0), 270.0), PLATFORM, &SonarScan::blank(), -1.0, &mut cmds);
    assert!(cmds.is_empty());
    assert!((SafetyOverride::dist_limit(Vec2D::new(3.0, 4.0)) - 75.0).abs() < 1e-9);
    assert!((SafetyOverride::dist_limit(Vec2D::new(10.0, 0.0)) - 100.0).abs() < 1e-9);
}
