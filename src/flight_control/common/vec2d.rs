use num::traits::{Float, Num};
use std::fmt::{Display, Formatter};
use std::ops::{Add, Mul, Neg, Sub};

/// A 2D vector generic over any numeric type.
///
/// Used for positions, velocities and offsets in screen coordinates: `x` grows to the
/// right, `y` grows downward for positions. Velocities keep the physical convention with
/// `y` positive upward, the conversion happens where positions are integrated.
///
/// # Type Parameters
/// * `T` - The functionality for the vector depends on traits implemented by `T`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct Vec2D<T> {
    /// The x-component of the vector.
    x: T,
    /// The y-component of the vector.
    y: T,
}

impl<T: Copy> Vec2D<T> {
    /// Creates a new vector with the given x and y components.
    ///
    /// # Arguments
    /// * `x` - The x-component of the vector.
    /// * `y` - The y-component of the vector.
    ///
    /// # Returns
    /// A new `Vec2D` object.
    pub const fn new(x: T, y: T) -> Self { Self { x, y } }

    /// Returns the x-component of the vector.
    pub const fn x(&self) -> T { self.x }

    /// Returns the y-component of the vector.
    pub const fn y(&self) -> T { self.y }
}

impl<T: Num + Copy> Vec2D<T> {
    /// Creates a zero vector (x = 0, y = 0).
    pub fn zero() -> Self { Self::new(T::zero(), T::zero()) }

    /// Computes the squared magnitude of the vector.
    ///
    /// # Returns
    /// `x² + y²` as a scalar of type `T`.
    pub fn abs_sq(&self) -> T { self.x * self.x + self.y * self.y }

    /// Creates a vector pointing from the current vector (`self`) to another vector (`other`).
    ///
    /// # Arguments
    /// * `other` - The target vector.
    ///
    /// # Returns
    /// A new vector representing the direction from `self` to `other`.
    pub fn to(&self, other: &Vec2D<T>) -> Vec2D<T> {
        Vec2D::new(other.x - self.x, other.y - self.y)
    }
}

impl<T: Float> Vec2D<T> {
    /// Computes the magnitude (absolute value) of the vector.
    pub fn abs(&self) -> T { self.abs_sq().sqrt() }

    /// Creates a unit vector for a bearing measured in degrees clockwise from vertical.
    ///
    /// The returned vector uses the physical convention (`y` positive upward), so a bearing of
    /// `0` yields `(0, 1)` and a bearing of `90` yields `(1, 0)`.
    ///
    /// # Arguments
    /// * `bearing_deg` - The bearing in degrees.
    pub fn from_bearing(bearing_deg: T) -> Self {
        let rad = bearing_deg.to_radians();
        Self::new(rad.sin(), rad.cos())
    }

    /// Returns `true` if both components are finite.
    pub fn is_finite(&self) -> bool { self.x.is_finite() && self.y.is_finite() }
}

impl<T: Num + Copy> Add for Vec2D<T> {
    type Output = Vec2D<T>;

    fn add(self, rhs: Self) -> Self::Output { Vec2D::new(self.x + rhs.x, self.y + rhs.y) }
}

impl<T: Num + Copy> Sub for Vec2D<T> {
    type Output = Vec2D<T>;

    fn sub(self, rhs: Self) -> Self::Output { Vec2D::new(self.x - rhs.x, self.y - rhs.y) }
}

impl<T: Num + Copy> Mul<T> for Vec2D<T> {
    type Output = Vec2D<T>;

    /// Implements the `*` operator for a `Vec2D` and a scalar.
    fn mul(self, rhs: T) -> Self::Output { Vec2D::new(self.x * rhs, self.y * rhs) }
}

impl<T: Neg<Output = T> + Copy> Neg for Vec2D<T> {
    type Output = Vec2D<T>;

    fn neg(self) -> Self::Output { Vec2D::new(-self.x, -self.y) }
}

impl<T: Copy> From<(T, T)> for Vec2D<T> {
    /// Creates a `Vec2D` from a tuple of (x, y) values.
    fn from(tuple: (T, T)) -> Self { Vec2D::new(tuple.0, tuple.1) }
}

impl<T: Display> Display for Vec2D<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(precision) = f.precision() {
            write!(f, "[{:.*}, {:.*}]", precision, self.x, precision, self.y)
        } else {
            write!(f, "[{}, {}]", self.x, self.y)
        }
    }
}
