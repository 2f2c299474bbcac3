use crate::flight_control::{
    common::{
        math::wrap_deg,
        physics::{LT_ACCEL, MT_ACCEL, RT_ACCEL, S_SCALE},
    },
    lander_io::Thruster,
};

/// Speed limits selected by distance, far to near.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityBands {
    pub far: f64,
    pub mid: f64,
    pub near: f64,
}

impl VelocityBands {
    /// Distance above which the far limit applies.
    pub const FAR_DISTANCE: f64 = 200.0;
    /// Distance above which the mid limit applies.
    pub const MID_DISTANCE: f64 = 100.0;

    /// Picks the speed limit for a distance (sign is ignored).
    pub fn limit(&self, distance: f64) -> f64 {
        let d = distance.abs();
        if d > Self::FAR_DISTANCE {
            self.far
        } else if d > Self::MID_DISTANCE {
            self.mid
        } else {
            self.near
        }
    }

    /// [`Self::limit`] eased down ahead of each boundary.
    ///
    /// A craft slowing at `decel` while it closes in reaches the next, slower band exactly at
    /// that band's boundary, so the limit never steps below the current speed.
    pub fn eased_limit(&self, distance: f64, decel: f64) -> f64 {
        let d = distance.abs();
        let approach = |slower: f64, boundary: f64| (slower * slower + 2.0 * decel * (d - boundary) / S_SCALE).sqrt();
        let mut limit = self.limit(d);
        if d > Self::MID_DISTANCE {
            limit = limit.min(approach(self.near, Self::MID_DISTANCE));
        }
        if d > Self::FAR_DISTANCE {
            limit = limit.min(approach(self.mid, Self::FAR_DISTANCE));
        }
        limit
    }
}

/// Axis-aligned region around the platform, `half_width` to each side and `depth` above.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformBox {
    pub half_width: f64,
    pub depth: f64,
}

impl PlatformBox {
    /// Whether a craft at offset `dx` and altitude `alt` from the platform lies inside.
    pub fn contains(&self, dx: f64, alt: f64) -> bool { dx.abs() < self.half_width && alt.abs() < self.depth }
}

/// Everything that differs between the main-engine, right-only and left-only control variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrusterProfile {
    pub primary: Thruster,
    pub max_accel: f64,
    pub lateral: VelocityBands,
    pub descent: VelocityBands,
    pub dead_band: f64,
    pub proximity_box: PlatformBox,
    pub flare_box: Option<PlatformBox>,
    pub ground_brake_power: f64,
}

impl ThrusterProfile {
    const LATERAL: VelocityBands = VelocityBands { far: 15.0, mid: 10.0, near: 5.0 };
    const SIDE_DESCENT: VelocityBands = VelocityBands { far: 16.0, mid: 7.0, near: 2.0 };
    const SIDE_PROXIMITY: PlatformBox = PlatformBox { half_width: 50.0, depth: 150.0 };
    const SIDE_FLARE: PlatformBox = PlatformBox { half_width: 40.0, depth: 15.0 };

    pub const MAIN: ThrusterProfile = ThrusterProfile {
        primary: Thruster::Main,
        max_accel: MT_ACCEL,
        lateral: Self::LATERAL,
        descent: VelocityBands { far: 20.0, mid: 10.0, near: 4.0 },
        dead_band: 30.0,
        proximity_box: PlatformBox { half_width: 100.0, depth: 150.0 },
        flare_box: None,
        ground_brake_power: 1.0,
    };

    pub const RIGHT_ONLY: ThrusterProfile = ThrusterProfile {
        primary: Thruster::Right,
        max_accel: RT_ACCEL,
        lateral: Self::LATERAL,
        descent: Self::SIDE_DESCENT,
        dead_band: 15.0,
        proximity_box: Self::SIDE_PROXIMITY,
        flare_box: Some(Self::SIDE_FLARE),
        ground_brake_power: 0.8,
    };

    pub const LEFT_ONLY: ThrusterProfile = ThrusterProfile {
        primary: Thruster::Left,
        max_accel: LT_ACCEL,
        lateral: Self::LATERAL,
        descent: Self::SIDE_DESCENT,
        dead_band: 20.0,
        proximity_box: Self::SIDE_PROXIMITY,
        flare_box: Some(Self::SIDE_FLARE),
        ground_brake_power: 1.0,
    };

    /// Bearing of the primary thrust relative to the craft orientation.
    pub fn bearing_offset(&self) -> f64 { self.primary.bearing_offset() }

    /// Craft orientation that points the primary thrust along world `bearing`.
    pub fn orientation_for(&self, bearing: f64) -> f64 { wrap_deg(bearing - self.bearing_offset()) }

    /// Orientation that makes the primary thruster push straight up.
    pub fn lift_orientation(&self) -> f64 { self.orientation_for(0.0) }

    /// Whether the craft is inside this profile's flare box, always `false` for the main engine.
    pub fn in_flare_box(&self, dx: f64, alt: f64) -> bool {
        self.flare_box.is_some_and(|b| b.contains(dx, alt))
    }
}
