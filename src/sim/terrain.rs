use crate::flight_control::common::Vec2D;

/// Axis-aligned rectangular obstacle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    min: Vec2D<f64>,
    max: Vec2D<f64>,
}

impl Obstacle {
    /// Creates an obstacle spanning the two given corners, in any order.
    pub fn new(a: Vec2D<f64>, b: Vec2D<f64>) -> Self {
        Self {
            min: Vec2D::new(a.x().min(b.x()), a.y().min(b.y())),
            max: Vec2D::new(a.x().max(b.x()), a.y().max(b.y())),
        }
    }

    pub fn contains(&self, p: Vec2D<f64>) -> bool {
        (self.min.x()..=self.max.x()).contains(&p.x()) && (self.min.y()..=self.max.y()).contains(&p.y())
    }

    /// Distance along `dir` from `origin` to the obstacle's boundary, slab method.
    fn intersect(&self, origin: Vec2D<f64>, dir: Vec2D<f64>) -> Option<f64> {
        let mut t_near = f64::NEG_INFINITY;
        let mut t_far = f64::INFINITY;
        for (o, d, lo, hi) in [
            (origin.x(), dir.x(), self.min.x(), self.max.x()),
            (origin.y(), dir.y(), self.min.y(), self.max.y()),
        ] {
            if d.abs() < f64::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let (t0, t1) = ((lo - o) / d, (hi - o) / d);
            t_near = t_near.max(t0.min(t1));
            t_far = t_far.min(t0.max(t1));
        }
        if t_near > t_far || t_far < 0.0 {
            return None;
        }
        Some(t_near.max(0.0))
    }
}

/// Simplified landscape: flat ground level with the platform, plus rectangular obstacles.
#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    ground_y: f64,
    platform: Vec2D<f64>,
    obstacles: Vec<Obstacle>,
}

impl Terrain {
    /// Half-width of the platform segment.
    pub const PLATFORM_HALF_WIDTH: f64 = 50.0;

    /// Flat ground at the platform's height.
    pub fn flat(platform: Vec2D<f64>) -> Self { Self { ground_y: platform.y(), platform, obstacles: Vec::new() } }

    pub fn with_obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    pub fn platform(&self) -> Vec2D<f64> { self.platform }
    pub fn ground_y(&self) -> f64 { self.ground_y }
    pub fn obstacles(&self) -> &[Obstacle] { &self.obstacles }

    /// Whether `x` lies over the platform segment.
    pub fn over_platform(&self, x: f64) -> bool { (x - self.platform.x()).abs() <= Self::PLATFORM_HALF_WIDTH }

    /// Whether a craft at `pos` touches the ground or an obstacle.
    pub fn in_contact(&self, pos: Vec2D<f64>) -> bool {
        pos.y() >= self.ground_y || self.obstacles.iter().any(|o| o.contains(pos))
    }

    /// Casts a ray from `origin` along a bearing (degrees clockwise from vertical).
    ///
    /// # Returns
    /// - The distance to the nearest surface hit within `max_range`, `None` if there is none.
    pub fn ray_cast(&self, origin: Vec2D<f64>, bearing_deg: f64, max_range: f64) -> Option<f64> {
        let up = Vec2D::from_bearing(bearing_deg);
        // screen y grows downward
        let dir = Vec2D::new(up.x(), -up.y());
        let ground = (dir.y() > f64::EPSILON)
            .then(|| (self.ground_y - origin.y()) / dir.y())
            .filter(|t| *t >= 0.0);
        self.obstacles
            .iter()
            .filter_map(|o| o.intersect(origin, dir))
            .chain(ground)
            .filter(|t| *t <= max_range)
            .min_by(f64::total_cmp)
    }
}
