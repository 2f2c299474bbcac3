/// Full turn in degrees.
pub const FULL_TURN: f64 = 360.0;
/// Half turn in degrees.
pub const HALF_TURN: f64 = 180.0;

/// Wraps an angle in degrees into `[0, 360)`.
///
/// # Arguments
/// - `deg`: The angle to wrap, any sign or magnitude.
///
/// # Returns
/// - The equivalent angle in `[0, 360)`.
pub fn wrap_deg(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(FULL_TURN);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= FULL_TURN { 0.0 } else { wrapped }
}

/// Computes the rotation that takes `current` to `dest` along the shorter arc.
///
/// The plain difference `dest - current` is used when its magnitude is at most a half turn,
/// otherwise the complementary wrap-around delta is returned. Positive values rotate
/// clockwise.
///
/// # Arguments
/// - `current`: The current orientation in degrees, `[0, 360)`.
/// - `dest`: The destination orientation in degrees, `[0, 360)`.
///
/// # Returns
/// - A signed rotation in degrees within `[-180, 180]`.
pub fn shortest_rotation(current: f64, dest: f64) -> f64 {
    let delta = dest - current;
    if delta.abs() <= HALF_TURN {
        delta
    } else if delta > 0.0 {
        delta - FULL_TURN
    } else {
        delta + FULL_TURN
    }
}

/// Checks whether two orientations are within `tol` degrees of each other, respecting wrap-around.
///
/// # Arguments
/// - `angle`: The measured orientation in degrees.
/// - `target`: The desired orientation in degrees.
/// - `tol`: The accepted deviation in degrees.
pub fn within_deg(angle: f64, target: f64, tol: f64) -> bool {
    shortest_rotation(wrap_deg(angle), wrap_deg(target)).abs() <= tol
}

/// Arithmetic mean of `n` draws from `sample`. Returns `NaN` for `n == 0`.
#[allow(clippy::cast_precision_loss)]
pub fn mean_of<F: FnMut() -> f64>(n: usize, mut sample: F) -> f64 {
    (0..n).map(|_| sample()).sum::<f64>() / n as f64
}
